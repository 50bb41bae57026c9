//! Best-effort roast captions for truths.
//!
//! The router only ever calls [`RoastGenerator::roast`], which cannot fail:
//! when generation is not configured or errors, a fixed caption comes back
//! instead. Which implementation is used is decided once by [`from_config`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gemini_agent::{GeminiClient, GenerationConfig};

use crate::config::RoastConfig;
use crate::error::{NerveError, Result};
use crate::types::MAX_CONTENT_CHARS;

/// Caption when no generation backend is configured.
pub const DISABLED_FALLBACK: &str =
    "🔥 Roast mode is on, but my roasting brain isn't plugged in. Consider yourself spared.";

/// Caption when the generation backend failed or returned nothing.
pub const ERRORED_FALLBACK: &str =
    "🔥 I tried to roast that, but even I couldn't find the words. Lucky you.";

pub const MAX_OUTPUT_TOKENS: u32 = 100;
pub const TEMPERATURE: f32 = 0.9;

/// Hard cap on a returned roast, independent of the token limit.
pub const MAX_ROAST_CHARS: usize = 300;

const PERSONA: &str = "You are a mean and savage roast comic. \
    You reply with a single short, witty and cutting roast. \
    Keep it under 100 characters, funny but mean, with no preamble.";

// ---------------------------------------------------------------------------
// RoastGenerator
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RoastGenerator: Send + Sync {
    /// Single attempt at a roast for `prompt`.
    async fn try_roast(&self, prompt: &str) -> Result<String>;

    /// Whether roasts come from a remote model.
    fn is_remote(&self) -> bool;

    /// A roast for `prompt`, or the matching fallback caption.
    async fn roast(&self, prompt: &str) -> String {
        match self.try_roast(prompt).await {
            Ok(text) => text,
            Err(e) => {
                if !matches!(e, NerveError::GenerationUnavailable) {
                    tracing::warn!(error = %e, "roast generation failed; using fallback");
                }
                fallback_for(&e).to_string()
            }
        }
    }
}

pub fn fallback_for(err: &NerveError) -> &'static str {
    match err {
        NerveError::GenerationUnavailable => DISABLED_FALLBACK,
        _ => ERRORED_FALLBACK,
    }
}

/// Used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticRoaster;

#[async_trait]
impl RoastGenerator for StaticRoaster {
    async fn try_roast(&self, _prompt: &str) -> Result<String> {
        Err(NerveError::GenerationUnavailable)
    }

    fn is_remote(&self) -> bool {
        false
    }
}

/// Roasts from Gemini, bounded in time and length.
#[derive(Debug)]
pub struct RemoteRoaster {
    client: GeminiClient,
    timeout: Duration,
}

impl RemoteRoaster {
    pub fn new(client: GeminiClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl RoastGenerator for RemoteRoaster {
    async fn try_roast(&self, prompt: &str) -> Result<String> {
        let prompt = build_prompt(prompt);
        let request = self.client.generate_text(
            Some(PERSONA),
            &prompt,
            GenerationConfig {
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                temperature: Some(TEMPERATURE),
            },
        );
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(text)) => Ok(clip(text.trim(), MAX_ROAST_CHARS)),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(NerveError::GenerationFailed(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    fn is_remote(&self) -> bool {
        true
    }
}

/// Pick the generator for `config`. Never fails: a missing key or a client
/// that cannot be built both degrade to [`StaticRoaster`].
pub fn from_config(config: &RoastConfig) -> Arc<dyn RoastGenerator> {
    let Some(key) = config.api_key() else {
        tracing::warn!("GOOGLE_API_KEY not set; roast mode will use a static caption");
        return Arc::new(StaticRoaster);
    };

    match GeminiClient::new(key, config.timeout) {
        Ok(client) => {
            let client = client.with_model(&config.model);
            let client = match config.base_url.as_deref() {
                Some(url) => client.with_base_url(url),
                None => client,
            };
            tracing::info!(model = %config.model, "roast generation enabled");
            Arc::new(RemoteRoaster::new(client, config.timeout))
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not build generation client; roasts disabled");
            Arc::new(StaticRoaster)
        }
    }
}

fn build_prompt(said: &str) -> String {
    format!(
        "The person said: \"{}\"\n\nRoast them for it.",
        clip(said, MAX_CONTENT_CHARS)
    )
}

fn clip(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}
