//! Process configuration, read once from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use stallbook_ai::gemini::DEFAULT_MODEL;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
/// Data files use UUID ids and amounts in paisa; files written by the
/// earlier dashboard (ids like `"p1"`, amounts in rupees) do not load.
pub const DEFAULT_DATA_DIR: &str = "data";
/// `STALLBOOK_DATA_DIR` value that selects the in-memory store.
pub const MEMORY_STORE: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    JsonDir(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub store: StoreConfig,
    /// `None` disables the suggestions endpoint.
    pub gemini: Option<GeminiConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STALLBOOK_BIND '{value}' is not a socket address: {source}")]
    InvalidBind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_value = get("STALLBOOK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBind {
                value: bind_value.clone(),
                source,
            })?;

        let store = match get("STALLBOOK_DATA_DIR") {
            Some(dir) if dir.eq_ignore_ascii_case(MEMORY_STORE) => StoreConfig::InMemory,
            Some(dir) => StoreConfig::JsonDir(PathBuf::from(dir)),
            None => StoreConfig::JsonDir(PathBuf::from(DEFAULT_DATA_DIR)),
        };

        let gemini = get("GEMINI_API_KEY").map(|api_key| GeminiConfig {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        });

        Ok(Self { bind, store, gemini })
    }

    /// In-memory store, no model; used by tests and local demos.
    pub fn in_memory() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            store: StoreConfig::InMemory,
            gemini: None,
        }
    }
}
