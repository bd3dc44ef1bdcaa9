use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::prompt::{DEFAULT_HOOK_COUNT, DEFAULT_TONE, Framework, HookRequest, MAX_HOOK_COUNT};

#[derive(Deserialize)]
pub struct GenerateHooksRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub frameworks: Vec<Framework>,
    pub tone: Option<String>,
    pub hook_count: Option<i64>,
    /// Caller's own credential. Ignored when the server has one provisioned.
    pub api_key: Option<String>,
}

impl GenerateHooksRequest {
    pub fn to_hook_request(&self) -> Result<HookRequest, AppError> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(AppError::MissingTopic);
        }

        let hook_count = match self.hook_count {
            None => DEFAULT_HOOK_COUNT,
            Some(count) => u8::try_from(count)
                .ok()
                .filter(|count| (1..=MAX_HOOK_COUNT).contains(count))
                .ok_or(AppError::InvalidHookCount {
                    max: MAX_HOOK_COUNT,
                })?,
        };

        let tone = self
            .tone
            .as_deref()
            .map(str::trim)
            .filter(|tone| !tone.is_empty())
            .unwrap_or(DEFAULT_TONE);

        Ok(HookRequest {
            topic: topic.to_string(),
            frameworks: self.frameworks.clone(),
            tone: tone.to_string(),
            hook_count,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateHooksResponse {
    pub hooks: String,
    pub usage_count: i64,
    pub is_paid: bool,
    pub remaining_uses: Option<i64>,
}
