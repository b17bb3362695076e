//! Configuration for the collection dashboard

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::CONFIG;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::constants;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml. Every field has a default, so the
/// file itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the collection sheet lives
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetConfig {
    #[serde(default = "default_sheet_id")]
    pub sheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Override for tests or a proxy in front of Google Docs
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_sheet_id() -> String {
    CONFIG.sheet_id.to_string()
}

fn default_sheet_name() -> String {
    CONFIG.sheet_name.to_string()
}

fn default_base_url() -> String {
    constants::SHEETS_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    constants::DEFAULT_TIMEOUT_SECS
}

fn default_host() -> String {
    constants::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    constants::DEFAULT_PORT
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_id: default_sheet_id(),
            sheet_name: default_sheet_name(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl SheetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| {
            format!(
                "Failed to parse {}. Check for:\n\
                 - Unknown keys (only [sheet] and [server] sections are read)\n\
                 - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
                 - Incorrect data types (strings vs numbers)\n\n\
                 See config.toml.example for the expected format.",
                path.display()
            )
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FileConfig::parse("").unwrap();
        assert_eq!(config.sheet.sheet_id, CONFIG.sheet_id);
        assert_eq!(config.sheet.sheet_name, "MONTHLY COLLECTION AVM");
        assert_eq!(config.sheet.base_url, constants::SHEETS_BASE_URL);
        assert_eq!(config.server.port, constants::DEFAULT_PORT);
    }

    #[test]
    fn test_partial_sections() {
        let config = FileConfig::parse(
            r#"
            [sheet]
            sheet_name = "COLLECTION 2026"
            timeout_secs = 30

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.sheet.sheet_id, CONFIG.sheet_id);
        assert_eq!(config.sheet.sheet_name, "COLLECTION 2026");
        assert_eq!(config.sheet.timeout(), Duration::from_secs(30));
        assert_eq!(config.server.host, constants::DEFAULT_HOST);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(FileConfig::parse("[sheet]\nsheet_idd = \"x\"").is_err());
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = FileConfig::parse("[sheet]\ntimeout_secs = 0").unwrap();
        assert_eq!(config.sheet.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.host, constants::DEFAULT_HOST);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = \"eighty\"").unwrap();
        let err = FileConfig::load_or_default(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }
}
