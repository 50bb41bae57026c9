use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse generateContent response: {source}")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("prompt blocked: {0}")]
    Blocked(String),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("response exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },
}

impl GeminiError {
    /// Map a transport failure, keeping timeouts distinguishable.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Timeout
        } else {
            GeminiError::Http(err)
        }
    }
}
