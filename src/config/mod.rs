use std::env;

use crate::ledger::TrialPolicy;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    /// Server-side credential. Takes precedence over a credential sent by the caller.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub payment_link_url: Option<String>,
    /// Whether a generation that fails upstream still consumes a trial use.
    pub charge_failed_generations: bool,
    pub trial_policy: TrialPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://hooks.db?mode=rwc".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            api_base_uri: "/api".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            payment_link_url: None,
            charge_failed_generations: true,
            trial_policy: TrialPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Config {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.server_port),
            api_base_uri: env::var("API_BASE_URI").unwrap_or(defaults.api_base_uri),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL")
                .unwrap_or(defaults.gemini_base_url),
            payment_link_url: non_empty_var("PAYMENT_LINK_URL"),
            charge_failed_generations: env::var("CHARGE_FAILED_GENERATIONS")
                .ok()
                .and_then(|flag| parse_flag(&flag))
                .unwrap_or(defaults.charge_failed_generations),
            trial_policy: defaults.trial_policy,
        }
    }

    /// Picks the credential for an outbound generation call. The provisioned key wins.
    pub fn resolve_api_key<'a>(&'a self, user_supplied: Option<&'a str>) -> Option<&'a str> {
        self.gemini_api_key
            .as_deref()
            .or(user_supplied)
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!("Ignoring unrecognised boolean value: {}", value);
            None
        }
    }
}
