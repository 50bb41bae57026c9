use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Paths reachable without a token.
const PUBLIC_PATHS: &[&str] = &["/api/health"];

/// Shared secret the gateway presents as `Authorization: Bearer <token>`.
///
/// When `token` is `None` the middleware is a transparent no-op. The CLI
/// always sets one; `none()` exists for embedding and tests.
#[derive(Clone)]
pub struct BridgeAuth {
    pub token: Option<String>,
}

impl BridgeAuth {
    pub fn none() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl std::fmt::Debug for BridgeAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeAuth")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Axum middleware that gates the bridge behind the shared token.
///
/// Auth flow (evaluated in order):
/// 1. `token` is `None` → passthrough
/// 2. Path is in [`PUBLIC_PATHS`] → passthrough
/// 3. `Authorization: Bearer <token>` matches → passthrough
/// 4. None matched → 401 `{"error":"unauthorized"}`
pub async fn auth_middleware(
    State(config): State<Arc<BridgeAuth>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(ref token) = config.token else {
        return next.run(req).await;
    };

    if PUBLIC_PATHS.contains(&req.uri().path()) {
        return next.run(req).await;
    }

    let presented = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);
    if let Some(presented) = presented {
        if tokens_match(presented, token) {
            return next.run(req).await;
        }
    }

    tracing::debug!(path = %req.uri().path(), "rejected request without valid bearer token");
    unauthorized()
}

fn unauthorized() -> Response {
    let mut resp = Response::new(Body::from(r#"{"error":"unauthorized"}"#));
    *resp.status_mut() = axum::http::StatusCode::UNAUTHORIZED;
    resp.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("application/json"),
    );
    resp
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The credential from an `Authorization` value, scheme case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

fn tokens_match(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
