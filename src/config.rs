//! Configuration file handling.
//!
//! Selects the service endpoint and transport options. The file is optional;
//! every field has a default.
//!
//! # Configuration Location
//!
//! - Linux: `~/.config/ossindex/config.toml`
//! - macOS: `~/Library/Application Support/ossindex/config.toml`
//! - Windows: `%APPDATA%\ossindex\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! endpoint = "production"
//! timeout_secs = 30
//! user_agent = "my-audit-tool/1.0"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;
use crate::transport::default_user_agent;

/// Release host.
pub const PRODUCTION_URL: &str = "https://ossindex.net";

/// Debug host, a service instance running on the local machine.
pub const LOCAL_URL: &str = "http://localhost:8080";

/// The service base URL, fixed for the lifetime of a client.
///
/// # Example
///
/// ```
/// use ossindex::Endpoint;
///
/// let endpoint: Endpoint = "local".parse().unwrap();
/// assert_eq!(endpoint.base_url(), "http://localhost:8080");
///
/// let custom: Endpoint = "http://127.0.0.1:9000/".parse().unwrap();
/// assert_eq!(custom.base_url(), "http://127.0.0.1:9000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    #[default]
    Production,
    Local,
    /// Any other base URL, typically a test server. Stored without a trailing `/`.
    Custom(String),
}

impl Endpoint {
    pub fn custom(url: impl Into<String>) -> Self {
        Endpoint::Custom(url.into().trim_end_matches('/').to_string())
    }

    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::Production => PRODUCTION_URL,
            Endpoint::Local => LOCAL_URL,
            Endpoint::Custom(url) => url,
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" | "release" => Ok(Endpoint::Production),
            "local" | "debug" => Ok(Endpoint::Local),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(Endpoint::custom(s.trim()))
            }
            _ => Err(Error::InvalidEndpoint(s.to_string())),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Production => write!(f, "production"),
            Endpoint::Local => write!(f, "local"),
            Endpoint::Custom(url) => write!(f, "{}", url),
        }
    }
}

/// Client configuration.
///
/// ```no_run
/// use ossindex::Config;
///
/// let config = Config::load().unwrap();
/// println!("Endpoint: {}", config.endpoint);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `"production"`, `"local"`, or a base URL.
    ///
    /// Default: `"production"`
    pub endpoint: String,

    /// Request timeout in seconds. When unset the HTTP library default applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Overrides the `ossindex/<version>` user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Production.to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl Config {
    /// Loads configuration from the config file, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration, creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ossindex")
            .join("config.toml")
    }

    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    pub fn endpoint(&self) -> std::result::Result<Endpoint, Error> {
        self.endpoint.parse()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The settings a client built from this config would use, one per line.
    pub fn describe(&self) -> Result<String> {
        let endpoint = self.endpoint()?;
        let timeout = match self.timeout_secs {
            Some(secs) => format!("{}s", secs),
            None => "none".to_string(),
        };
        let user_agent = self.user_agent.clone().unwrap_or_else(default_user_agent);

        Ok(format!(
            "Endpoint:   {}\nTimeout:    {}\nUser agent: {}",
            endpoint.base_url(),
            timeout,
            user_agent
        ))
    }
}
