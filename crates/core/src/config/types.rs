use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    9090
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("retro-drop.db")
}

/// Remote directory-listing source.
///
/// Each system key maps to a path segment below `base_url`; the path is
/// expected to be percent-encoded already, as it appears in the listing links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Base URL of the file index (e.g., "https://myrient.erista.me")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (unset: transport default)
    #[serde(default)]
    pub timeout_secs: Option<u32>,
    /// Custom User-Agent header for listing requests
    #[serde(default)]
    pub user_agent: Option<String>,
    /// System key -> listing path. Sorted, which also fixes the sync order.
    #[serde(default = "default_systems")]
    pub systems: BTreeMap<String, String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: None,
            systems: default_systems(),
        }
    }
}

impl SourceConfig {
    /// Configured system keys, in sync order.
    pub fn system_keys(&self) -> Vec<String> {
        self.systems.keys().cloned().collect()
    }

    /// Build the listing URL for a system, if it is configured.
    pub fn listing_url(&self, system: &str) -> Option<String> {
        self.systems
            .get(system)
            .map(|path| join_listing_url(&self.base_url, path))
    }

    /// `(system, listing URL)` pairs, in sync order.
    pub fn listings(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.systems
            .iter()
            .map(|(system, path)| (system.as_str(), join_listing_url(&self.base_url, path)))
    }
}

fn join_listing_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

fn default_base_url() -> String {
    "https://myrient.erista.me".to_string()
}

fn default_systems() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "gba".to_string(),
            "/files/No-Intro/Nintendo%20-%20Game%20Boy%20Advance/".to_string(),
        ),
        (
            "snes".to_string(),
            "/files/No-Intro/Nintendo%20-%20Super%20Nintendo%20Entertainment%20System/"
                .to_string(),
        ),
    ])
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub source: SanitizedSourceConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourceConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u32>,
    pub custom_user_agent: bool,
    pub systems: Vec<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            source: SanitizedSourceConfig {
                base_url: config.source.base_url.clone(),
                timeout_secs: config.source.timeout_secs,
                custom_user_agent: config.source.user_agent.is_some(),
                systems: config.source.system_keys(),
            },
        }
    }
}
