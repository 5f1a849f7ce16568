//! # Quote Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RESHELF_CURRENCY_SYMBOL=PHP                                        │
//! │     RESHELF_RECOMMEND_LIMIT=4                                          │
//! │     RESHELF_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/reshelf/quote.toml (Linux)                               │
//! │     ~/Library/Application Support/com.reshelf.reshelf/quote.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ₱, 6 recommendations, "info,reshelf=debug"                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! [currency]
//! symbol = "₱"
//!
//! [recommend]
//! limit = 6
//!
//! [log]
//! filter = "info,reshelf=debug"
//! ```
//!
//! `RUST_LOG`, when set, still wins over `log.filter`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use reshelf_core::money::CURRENCY_SYMBOL;
use reshelf_core::recommend::DEFAULT_RECOMMENDATION_LIMIT;

use crate::error::ConfigError;

/// Default log filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,reshelf=debug";

/// Largest recommendation rail the CLI will produce.
pub const MAX_RECOMMENDATION_LIMIT: usize = 50;

// =============================================================================
// Sections
// =============================================================================

/// `[currency]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// Symbol used for plain-text amounts.
    pub symbol: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            symbol: CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// `[recommend]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendSettings {
    /// Default number of recommendations when `--limit` is absent.
    pub limit: usize,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        RecommendSettings {
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

// =============================================================================
// Quote Config
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub recommend: RecommendSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`quote.toml`)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` must exist; the platform default may not.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading quote config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.symbol.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "currency.symbol".into(),
                reason: "must not be empty".into(),
            });
        }

        if self.recommend.limit == 0 || self.recommend.limit > MAX_RECOMMENDATION_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "recommend.limit".into(),
                reason: format!("must be between 1 and {}", MAX_RECOMMENDATION_LIMIT),
            });
        }

        if let Err(e) = EnvFilter::try_new(&self.log.filter) {
            return Err(ConfigError::InvalidValue {
                key: "log.filter".into(),
                reason: e.to_string(),
            });
        }

        Ok(())
    }

    /// Applies `RESHELF_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(symbol) = lookup("RESHELF_CURRENCY_SYMBOL") {
            debug!(symbol = %symbol, "Overriding currency symbol from environment");
            self.currency.symbol = symbol;
        }

        if let Some(limit) = lookup("RESHELF_RECOMMEND_LIMIT") {
            match limit.parse::<usize>() {
                Ok(n) => self.recommend.limit = n,
                Err(_) => warn!(limit = %limit, "Ignoring non-numeric RESHELF_RECOMMEND_LIMIT"),
            }
        }

        if let Some(filter) = lookup("RESHELF_LOG") {
            self.log.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "reshelf", "reshelf")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = QuoteConfig::default();
        assert_eq!(config.currency.symbol, "₱");
        assert_eq!(config.recommend.limit, 6);
        assert_eq!(config.log.filter, DEFAULT_LOG_FILTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[recommend]\nlimit = 3\n");
        let config = QuoteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.recommend.limit, 3);
        assert_eq!(config.currency.symbol, "₱");
    }

    #[test]
    fn test_empty_sections_fall_back_to_defaults() {
        let file = write_config("[currency]\n\n[recommend]\n\n[log]\n");
        let config = QuoteConfig::from_file(file.path()).unwrap();
        assert_eq!(config, QuoteConfig::default());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            QuoteConfig::load(Some(missing)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_explicit_file_validates() {
        let file = write_config("[recommend]\nlimit = 0\n");
        assert!(matches!(
            QuoteConfig::load(Some(file.path().to_path_buf())),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let file = write_config("[recommend\nlimit = ");
        assert!(matches!(
            QuoteConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = QuoteConfig::default();
        config.recommend.limit = 0;
        assert!(config.validate().is_err());

        config.recommend.limit = MAX_RECOMMENDATION_LIMIT + 1;
        assert!(config.validate().is_err());

        config.recommend.limit = 4;
        config.currency.symbol = "  ".into();
        assert!(config.validate().is_err());

        config.currency.symbol = "PHP ".into();
        config.log.filter = "reshelf=notalevel".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RESHELF_CURRENCY_SYMBOL", "PHP "),
            ("RESHELF_RECOMMEND_LIMIT", "lots"),
            ("RESHELF_LOG", "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = QuoteConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.currency.symbol, "PHP ");
        // Unparseable limit is ignored
        assert_eq!(config.recommend.limit, 6);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = QuoteConfig::default();
        config.recommend.limit = 9;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: QuoteConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
