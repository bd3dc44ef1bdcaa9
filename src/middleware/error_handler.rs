use axum::{
    body::{Body, to_bytes},
    http::{Request, header::CONTENT_LENGTH},
    middleware::Next,
    response::Response,
};
use tracing::error;

const MAX_LOGGED_CHARS: usize = 2048;

/// Logs method, path and body of every 5xx response. The client still receives the full body.
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    if !response.status().is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(
                "Server error on {} {} - Status: {}, body unreadable: {}",
                method, path, parts.status, e
            );
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    let logged: String = text.chars().take(MAX_LOGGED_CHARS).collect();
    error!(
        "Server error on {} {} - Status: {}, Body: {}{}",
        method,
        path,
        parts.status,
        logged,
        if logged.len() < text.len() { " [truncated]" } else { "" }
    );

    Response::from_parts(parts, Body::from(bytes))
}
