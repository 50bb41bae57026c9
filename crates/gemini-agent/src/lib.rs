//! `gemini-agent`: minimal typed client for Gemini `generateContent`.
//!
//! Only the slice of the REST protocol that a single-shot text completion
//! needs is modelled: one request, one response, no streaming, no retries.
//!
//! # Architecture
//!
//! ```text
//! GenerateContentRequest   ← contents + optional system instruction + GenerationConfig
//!     │
//!     ▼
//! GeminiClient             ← POST {base}/v1beta/models/{model}:generateContent
//!     │                      key in `x-goog-api-key`, client-level timeout
//!     ▼
//! GenerateContentResponse  ← candidates / promptFeedback / usageMetadata
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use gemini_agent::{GeminiClient, GenerationConfig};
//!
//! let client = GeminiClient::new(api_key, Duration::from_secs(8))?;
//! let text = client
//!     .generate_text(Some("Answer in one line."), "say hello", GenerationConfig::default())
//!     .await?;
//! println!("{text}");
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::GeminiError;
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    PromptFeedback, UsageMetadata,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GeminiError>;
