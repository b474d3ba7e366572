//! Handles settings for the application.
//!
//! Values are read from `settings.toml` (or the file named by
//! `LOANBOOK_CONFIG`), then overridden by `LOANBOOK__SECTION__KEY`
//! environment variables, e.g. `LOANBOOK__SERVER__PORT=8080`. Lists are
//! comma separated: `LOANBOOK__SERVER__ALLOWED_ORIGINS=http://a,http://b`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";
const CONFIG_PATH_VAR: &str = "LOANBOOK_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub allowed_origins: Vec<String>,
    /// Load demo loans at startup when the book is empty.
    pub seed: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            database: Database::Memory,
            allowed_origins: Vec::new(),
            seed: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("LOANBOOK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
