//! Runtime configuration for the bot.
//!
//! These are plain structs; the binary fills them from flags and the
//! environment once at startup. Nothing in this crate reads the environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "truthordare.db";
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_ROAST_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_ADMIN_TTL: Duration = Duration::from_secs(60 * 60);
pub use gemini_agent::DEFAULT_MODEL as DEFAULT_GEMINI_MODEL;

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct StoreConfig {
    /// Networked backend descriptor. Only `postgres://` / `postgresql://`
    /// URLs select the networked backend.
    pub database_url: Option<String>,
    /// File used by the embedded backend.
    pub sqlite_path: PathBuf,
    /// Bound on every single store operation.
    pub op_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            sqlite_path: PathBuf::from(DEFAULT_DB_PATH),
            op_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("sqlite_path", &self.sqlite_path)
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RoastConfig
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct RoastConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Override for the API host; `None` uses the public endpoint.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl RoastConfig {
    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

impl Default for RoastConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
            timeout: DEFAULT_ROAST_TIMEOUT,
        }
    }
}

impl fmt::Debug for RoastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoastConfig")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SessionPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// How long an admin grant lasts. `None` never expires.
    pub admin_ttl: Option<Duration>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            admin_ttl: Some(DEFAULT_ADMIN_TTL),
        }
    }
}

// ---------------------------------------------------------------------------
// BotConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct BotConfig {
    pub admin_password: Option<String>,
    pub store: StoreConfig,
    pub roast: RoastConfig,
    pub session: SessionPolicy,
}

impl BotConfig {
    /// The admin password, if one is set and not blank.
    pub fn admin_password(&self) -> Option<&str> {
        non_blank(self.admin_password.as_deref())
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("admin_password", &self.admin_password().map(|_| "<redacted>"))
            .field("store", &self.store)
            .field("roast", &self.roast)
            .field("session", &self.session)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_secrets_count_as_absent() {
        let cfg = BotConfig {
            admin_password: Some("   ".into()),
            roast: RoastConfig {
                api_key: Some("".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(cfg.admin_password(), None);
        assert_eq!(cfg.roast.api_key(), None);
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = BotConfig {
            admin_password: Some("hunter2".into()),
            store: StoreConfig {
                database_url: Some("postgres://bot:pw@db/nerve".into()),
                ..Default::default()
            },
            roast: RoastConfig {
                api_key: Some("AIza-secret".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("bot:pw"));
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn defaults_use_embedded_store() {
        let cfg = StoreConfig::default();
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.sqlite_path, PathBuf::from(DEFAULT_DB_PATH));
    }
}
