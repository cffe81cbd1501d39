//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//!
//! 1. Environment variables (`LOOTWATCH_*`)
//! 2. TOML config file (explicit path or `LOOTWATCH_CONFIG_FILE`)
//! 3. Built-in defaults

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{MessageStyle, SourceId};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid value for {field}: {hint}")]
    Invalid { field: String, hint: String },
}

/// Per-source command and announcement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Chat command that triggers this source
    pub command: String,

    /// Announcement shape: "single" or "multi"
    pub style: String,
}

/// Application configuration with layered loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat transport credential; only a real transport needs it
    #[serde(default)]
    pub token: Option<String>,

    /// Epic Games command and style
    #[serde(default = "default_epic")]
    pub epic: SourceConfig,

    /// Prime Gaming command and style
    #[serde(default = "default_prime")]
    pub prime: SourceConfig,

    /// Base game names whose Prime Gaming offers are announced
    #[serde(default)]
    pub games_to_include: Vec<String>,

    /// Two-letter country code for the Epic promotions endpoint
    #[serde(default = "default_country")]
    pub country: String,

    /// How long a cached snapshot stays usable
    #[serde(default = "default_cache_max_age_hours")]
    pub cache_max_age_hours: u64,

    /// How long the Prime Gaming page gets to finish client-side rendering
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
}

fn default_epic() -> SourceConfig {
    SourceConfig {
        command: "!epic".into(),
        style: "single".into(),
    }
}

fn default_prime() -> SourceConfig {
    SourceConfig {
        command: "!prime".into(),
        style: "single".into(),
    }
}

fn default_country() -> String {
    "DE".into()
}

fn default_cache_max_age_hours() -> u64 {
    24
}

fn default_settle_delay_secs() -> u64 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token: None,
            epic: default_epic(),
            prime: default_prime(),
            games_to_include: Vec::new(),
            country: default_country(),
            cache_max_age_hours: default_cache_max_age_hours(),
            settle_delay_secs: default_settle_delay_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence
    ///
    /// `config_file` takes precedence over the `LOOTWATCH_CONFIG_FILE`
    /// environment variable for locating the TOML file
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        } else if let Ok(path) = std::env::var("LOOTWATCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&path));
        }

        figment = figment.merge(
            Env::prefixed("LOOTWATCH_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that loaded values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, source) in [("epic.style", &self.epic), ("prime.style", &self.prime)] {
            if MessageStyle::parse(&source.style).is_none() {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    hint: format!("expected \"single\" or \"multi\", got {:?}", source.style),
                });
            }
        }

        if self.cache_max_age_hours == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_age_hours".into(),
                hint: "must be at least 1".into(),
            });
        }

        Ok(())
    }

    /// Per-source settings
    pub fn source(&self, source: SourceId) -> &SourceConfig {
        match source {
            SourceId::Epic => &self.epic,
            SourceId::Prime => &self.prime,
        }
    }

    /// Parsed announcement style for a source
    ///
    /// Falls back to the default style; `validate` already rejected
    /// unparsable values at load time
    pub fn style(&self, source: SourceId) -> MessageStyle {
        MessageStyle::parse(&self.source(source).style).unwrap_or_default()
    }

    /// Allow-list for a source, when it has one
    pub fn allow_list(&self, source: SourceId) -> Option<&[String]> {
        match source {
            SourceId::Prime => Some(self.games_to_include.as_slice()),
            SourceId::Epic => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.token.is_none());
        assert_eq!(config.epic.command, "!epic");
        assert_eq!(config.prime.command, "!prime");
        assert_eq!(config.country, "DE");
        assert_eq!(config.cache_max_age_hours, 24);
        assert_eq!(config.settle_delay_secs, 3);
        assert!(config.games_to_include.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_styles_parse_as_single() {
        let config = AppConfig::default();
        assert_eq!(config.style(SourceId::Epic), MessageStyle::Single);
        assert_eq!(config.style(SourceId::Prime), MessageStyle::Single);
    }

    #[test]
    fn test_validate_rejects_unknown_style() {
        let mut config = AppConfig::default();
        config.prime.style = "combined".into();

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_max_age() {
        let config = AppConfig {
            cache_max_age_hours: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_allow_list_only_for_prime() {
        let config = AppConfig {
            games_to_include: vec!["Alpha".into()],
            ..Default::default()
        };
        assert_eq!(config.allow_list(SourceId::Prime).unwrap().len(), 1);
        assert!(config.allow_list(SourceId::Epic).is_none());
    }
}
