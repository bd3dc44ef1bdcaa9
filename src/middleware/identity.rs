use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

pub const LOOPBACK_PLACEHOLDER: &str = "127.0.0.1";

/// Ledger key for the caller, taken from `X-Forwarded-For` without any verification.
///
/// Any client can set this header, so the identifier is a spoofable placeholder and not an
/// authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn resolve_identifier(headers: &HeaderMap) -> ClientIdentity {
    // first non-empty entry of X-Forwarded-For
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()));

    ClientIdentity(forwarded.unwrap_or(LOOPBACK_PLACEHOLDER).to_string())
}

pub async fn identify_client(mut req: Request<Body>, next: Next) -> Response {
    let identity = resolve_identifier(req.headers());
    tracing::debug!(identifier = %identity.0, "Resolved client identity");

    req.extensions_mut().insert(identity);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(forwarded: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(forwarded).unwrap());
        headers
    }

    #[test]
    fn missing_header_falls_back_to_loopback() {
        assert_eq!(
            resolve_identifier(&HeaderMap::new()),
            ClientIdentity(LOOPBACK_PLACEHOLDER.into())
        );
    }

    #[test]
    fn first_forwarded_entry_wins() {
        assert_eq!(
            resolve_identifier(&headers("203.0.113.7, 10.0.0.1")).as_str(),
            "203.0.113.7"
        );
        assert_eq!(resolve_identifier(&headers(" , 198.51.100.2")).as_str(), "198.51.100.2");
    }

    #[test]
    fn blank_header_falls_back_to_loopback() {
        assert_eq!(resolve_identifier(&headers("  ")).as_str(), LOOPBACK_PLACEHOLDER);
    }
}
