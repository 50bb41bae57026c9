use thiserror::Error;

#[derive(Debug, Error)]
pub enum NerveError {
    #[error("content must not be empty and at most {max} characters", max = crate::types::MAX_CONTENT_CHARS)]
    InvalidContent,

    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("roast generation is not configured")]
    GenerationUnavailable,

    #[error("roast generation failed: {0}")]
    GenerationFailed(String),

    #[error("invalid partition '{0}': expected 'truths' or 'dares'")]
    InvalidPartition(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NerveError {
    /// Wrap any backend failure as `StoreUnavailable`, keeping only its message.
    pub fn store(err: impl std::fmt::Display) -> Self {
        NerveError::StoreUnavailable(err.to_string())
    }
}

impl From<rusqlite::Error> for NerveError {
    fn from(err: rusqlite::Error) -> Self {
        NerveError::store(err)
    }
}

impl From<sqlx::Error> for NerveError {
    fn from(err: sqlx::Error) -> Self {
        NerveError::store(err)
    }
}

impl From<gemini_agent::GeminiError> for NerveError {
    fn from(err: gemini_agent::GeminiError) -> Self {
        NerveError::GenerationFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NerveError>;
