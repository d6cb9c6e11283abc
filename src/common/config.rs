//! # Configuration Utilities
//!
//! Client settings loaded from a TOML file, plus the one deployment switch the
//! client has: which backend base URL to talk to.
//!
//! # Example TOML
//!
//! ```toml
//! [backend]
//! origin = "http://127.0.0.1:5500"
//! # base_url = "https://lifelink.example.my"
//!
//! [session]
//! path = "user-data/session.json"
//! ```

use anyhow::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;

/// Backend used when the client runs on a developer machine.
pub const LOCAL_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ClientConfig = load_config("config/client.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Where the records backend lives
    #[serde(default)]
    pub backend: BackendConfig,
    /// Where session state is persisted
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend location settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin the client is served from (e.g. "https://lifelink.up.railway.app")
    #[serde(default)]
    pub origin: Option<String>,
    /// Explicit API base URL; skips origin-based detection when set
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Session persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding the persisted key-value session state
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: "user-data/session.json".to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads client configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        load_config(path)
    }

    /// Resolves the API base URL once, at startup.
    pub fn base_url(&self) -> String {
        match &self.backend.base_url {
            Some(explicit) => explicit.trim_end_matches('/').to_string(),
            None => resolve_base_url(self.backend.origin.as_deref()),
        }
    }
}

/// Picks the backend for a given page origin.
///
/// A non-local hostname means the client is served by the backend itself, so
/// the origin is reused. Anything else (no origin, `localhost`, `127.0.0.1`,
/// unparseable) falls back to [`LOCAL_BACKEND_URL`].
pub fn resolve_base_url(origin: Option<&str>) -> String {
    let Some(origin) = origin else {
        return LOCAL_BACKEND_URL.to_string();
    };

    match Url::parse(origin) {
        Ok(url) => match url.host_str() {
            Some("localhost") | Some("127.0.0.1") | None => LOCAL_BACKEND_URL.to_string(),
            Some(_) => url.origin().ascii_serialization(),
        },
        Err(_) => LOCAL_BACKEND_URL.to_string(),
    }
}
