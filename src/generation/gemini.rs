use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{GenerationError, TextGenerator};

/// Longest upstream error text carried into a `GenerationError`.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate_content(&self, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Calling generation service");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            // prefer the structured message; error pages from proxies can be huge
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or(raw);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: truncate_message(message.trim()),
            });
        }

        let reply: GenerateContentResponse = response.json().await?;
        extract_text(reply)
    }
}

fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}…", &message[..cut]),
        None => message.to_string(),
    }
}

fn extract_text(reply: GenerateContentResponse) -> Result<String, GenerationError> {
    let text = reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

impl TextGenerator for GeminiClient {
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(self.generate_content(api_key, prompt))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    #[tokio::test]
    async fn joins_text_parts_of_first_candidate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "secret")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": "make hooks" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [
                        { "content": { "parts": [{ "text": "- **Hook:** Stop" }, { "text": " scrolling" }] } },
                        { "content": { "parts": [{ "text": "ignored" }] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GeminiClient::new(server.url(), "gemini-1.5-flash");
        let text = client.generate("secret", "make hooks").await.unwrap();

        assert_eq!(text, "- **Hook:** Stop scrolling");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn surfaces_service_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(format!("{}/", server.url()), "gemini-1.5-flash");
        let err = client.generate("bad", "prompt").await.unwrap_err();

        match err {
            GenerationError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_error_page_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        let page = format!("<html><body>{}</body></html>", "bad gateway ".repeat(800));
        let _mock = server
            .mock("POST", PATH)
            .with_status(502)
            .with_header("content-type", "text/html")
            .with_body(page)
            .create_async()
            .await;

        let client = GeminiClient::new(server.url(), "gemini-1.5-flash");
        let err = client.generate("k", "prompt").await.unwrap_err();

        match err {
            GenerationError::Status { status, message } => {
                assert_eq!(status, 502);
                assert!(message.starts_with("<html><body>bad gateway"));
                assert_eq!(message.chars().count(), MAX_ERROR_MESSAGE_CHARS + 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_messages_are_kept_whole() {
        assert_eq!(truncate_message("quota exceeded"), "quota exceeded");
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(server.url(), "gemini-1.5-flash");
        let err = client.generate("k", "prompt").await.unwrap_err();

        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = GeminiClient::new(server.url(), "gemini-1.5-flash");
        let err = client.generate("k", "prompt").await.unwrap_err();

        assert!(matches!(err, GenerationError::Transport(_)));
    }
}
