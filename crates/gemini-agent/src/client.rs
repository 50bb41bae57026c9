use std::time::Duration;

use crate::types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::{GeminiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Upper bound on how much of an error body is kept in [`GeminiError::Api`].
const MAX_ERROR_BODY: usize = 500;

/// Responses larger than this are abandoned mid-read.
pub const MAX_RESPONSE_BYTES: usize = 256 * 1024;

// ─── GeminiClient ─────────────────────────────────────────────────────────

/// Single-attempt client for the `generateContent` endpoint.
///
/// The API key travels in the `x-goog-api-key` header rather than the query
/// string so it never appears in request URLs.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.into().trim().to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point the client at another host (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one `generateContent` request and decode the response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let mut res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(GeminiError::from_send)?;

        let status = res.status();
        let mut raw = Vec::new();
        while let Some(chunk) = res.chunk().await.map_err(GeminiError::from_send)? {
            if raw.len() + chunk.len() > MAX_RESPONSE_BYTES {
                return Err(GeminiError::ResponseTooLarge {
                    limit: MAX_RESPONSE_BYTES,
                });
            }
            raw.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&raw);

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), model = %self.model, "generateContent failed");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|source| GeminiError::Parse {
            body: truncate(&body, MAX_ERROR_BODY),
            source,
        })
    }

    /// Generate a single text completion for `prompt`.
    ///
    /// Blocked prompts and candidates without text are errors, so callers
    /// only ever see non-empty, trimmed text on success.
    pub async fn generate_text(
        &self,
        system: Option<&str>,
        prompt: &str,
        config: GenerationConfig,
    ) -> Result<String> {
        let request = GenerateContentRequest::from_prompt(system, prompt, config);
        let response = self.generate_content(&request).await?;

        if let Some(reason) = response.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }
        response.text().ok_or(GeminiError::EmptyResponse)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
