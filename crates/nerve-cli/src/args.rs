//! Flags shared by several subcommands. Every flag can also come from the
//! environment (or a `.env` file loaded at startup).

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use nerve_core::config::{
    BotConfig, RoastConfig, SessionPolicy, StoreConfig, DEFAULT_DB_PATH, DEFAULT_GEMINI_MODEL,
};

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Postgres URL; anything else (or nothing) uses the embedded SQLite file
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// SQLite file used when no Postgres URL is given
    #[arg(long, env = "NERVE_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Upper bound on any single store operation, in milliseconds
    #[arg(long, env = "NERVE_STORE_TIMEOUT_MS", default_value = "5000")]
    pub store_timeout_ms: u64,
}

impl StoreArgs {
    pub fn config(&self) -> StoreConfig {
        StoreConfig {
            database_url: self.database_url.clone(),
            sqlite_path: self.db_path.clone(),
            op_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct BotArgs {
    /// Password for /admin; unset means nobody can become admin
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Gemini API key; unset disables generated roasts
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for roasts
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Override for the Gemini API host
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,

    /// Upper bound on a roast request, in milliseconds
    #[arg(long, env = "NERVE_ROAST_TIMEOUT_MS", default_value = "8000")]
    pub roast_timeout_ms: u64,

    /// How long /admin rights last, in seconds (0 = until restart)
    #[arg(long, env = "NERVE_ADMIN_TTL_SECS", default_value = "3600")]
    pub admin_ttl_secs: u64,

    #[command(flatten)]
    pub store: StoreArgs,
}

impl BotArgs {
    pub fn config(&self) -> BotConfig {
        BotConfig {
            admin_password: self.admin_password.clone(),
            store: self.store.config(),
            roast: RoastConfig {
                api_key: self.gemini_api_key.clone(),
                model: self.gemini_model.clone(),
                base_url: self.gemini_base_url.clone(),
                timeout: Duration::from_millis(self.roast_timeout_ms),
            },
            session: SessionPolicy {
                admin_ttl: (self.admin_ttl_secs > 0)
                    .then(|| Duration::from_secs(self.admin_ttl_secs)),
            },
        }
    }
}
