//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → CLI flags.
//!
//! Config lives at `~/.banter/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::assistant::canned::default_reply_pool;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BanterConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Canned reply pool. An empty or missing list falls back to the
    /// built-in set.
    #[serde(default)]
    pub replies: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub reply_delay_ms: Option<u64>,
    pub greeting: Option<String>,
    pub default_title: Option<String>,
    pub sidebar_open: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;
pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";
pub const DEFAULT_TITLE: &str = "New conversation";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub reply_delay_ms: u64,
    pub greeting: String,
    pub default_title: String,
    pub sidebar_open: bool,
    /// Guaranteed non-empty by `resolve()`.
    pub replies: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            greeting: DEFAULT_GREETING.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            sidebar_open: true,
            replies: default_reply_pool(),
        }
    }
}

/// Settings supplied on the command line, overriding the config file.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub reply_delay_ms: Option<u64>,
    pub hide_sidebar: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.banter/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".banter").join("config.toml"))
}

/// Load config from `~/.banter/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BanterConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BanterConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BanterConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(BanterConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: BanterConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# banter configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → CLI flags.

# [general]
# reply_delay_ms = 1000
# greeting = "Hello! How can I help you today?"
# default_title = "New conversation"
# sidebar_open = true

# Replace the canned assistant replies. An empty list falls back to the
# built-in set.
# replies = [
#     "I understand your question. Let me help you with that.",
# ]
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Could not create config directory: {e}");
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Could not write default config: {e}");
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Collapse the override hierarchy into concrete values.
pub fn resolve(config: BanterConfig, cli: &CliOverrides) -> ResolvedConfig {
    let general = config.general;
    let replies = if config.replies.is_empty() {
        default_reply_pool()
    } else {
        config.replies
    };

    ResolvedConfig {
        reply_delay_ms: cli
            .reply_delay_ms
            .or(general.reply_delay_ms)
            .unwrap_or(DEFAULT_REPLY_DELAY_MS),
        greeting: general.greeting.unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        default_title: general
            .default_title
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        sidebar_open: if cli.hide_sidebar {
            false
        } else {
            general.sidebar_open.unwrap_or(true)
        },
        replies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sparse_toml() {
        let config: BanterConfig = toml::from_str(
            r#"
            [general]
            reply_delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.general.reply_delay_ms, Some(250));
        assert_eq!(config.general.greeting, None);
        assert!(config.replies.is_empty());
    }

    #[test]
    fn parse_reply_pool() {
        let config: BanterConfig = toml::from_str(
            r#"
            replies = ["a", "b"]

            [general]
            greeting = "hi"
            "#,
        )
        .unwrap();
        assert_eq!(config.replies, vec!["a", "b"]);
        assert_eq!(config.general.greeting.as_deref(), Some("hi"));
    }

    #[test]
    fn parse_rejects_malformed_toml() {
        let result = toml::from_str::<BanterConfig>("[general\nreply_delay_ms = 1");
        assert!(result.is_err());
    }

    #[test]
    fn resolve_fills_defaults() {
        let resolved = resolve(BanterConfig::default(), &CliOverrides::default());
        assert_eq!(resolved.reply_delay_ms, DEFAULT_REPLY_DELAY_MS);
        assert_eq!(resolved.greeting, DEFAULT_GREETING);
        assert_eq!(resolved.default_title, DEFAULT_TITLE);
        assert!(resolved.sidebar_open);
        assert!(!resolved.replies.is_empty());
    }

    #[test]
    fn cli_overrides_beat_file_values() {
        let config: BanterConfig = toml::from_str(
            r#"
            [general]
            reply_delay_ms = 250
            sidebar_open = true
            "#,
        )
        .unwrap();
        let cli = CliOverrides {
            reply_delay_ms: Some(50),
            hide_sidebar: true,
        };
        let resolved = resolve(config, &cli);
        assert_eq!(resolved.reply_delay_ms, 50);
        assert!(!resolved.sidebar_open);
    }

    #[test]
    fn empty_reply_pool_falls_back_to_builtin() {
        let config: BanterConfig = toml::from_str("replies = []").unwrap();
        let resolved = resolve(config, &CliOverrides::default());
        assert!(!resolved.replies.is_empty());
    }
}
