//! Configuration loading
//!
//! Parses `kitchen.toml` text into a [`KitchenConfig`]. Missing keys take
//! their defaults, unknown keys are rejected so typos don't go unnoticed.

use super::types::{KitchenConfig, MAX_POPUP_MS};

/// Configuration compiled into the firmware
pub const EMBEDDED_CONFIG: &str = include_str!("../../kitchen.toml");

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML parsing failed (syntax, unknown key, wrong type, text too long)
    Parse,
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// A value is out of range
    InvalidValue,
}

impl KitchenConfig {
    /// Parse and validate TOML text
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: KitchenConfig = toml::from_str(input).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML read back from storage
    pub fn from_bytes(input: &[u8]) -> Result<Self, ConfigError> {
        let text = core::str::from_utf8(input).map_err(|_| ConfigError::InvalidUtf8)?;
        Self::from_toml(text)
    }

    /// The embedded configuration, or defaults if it fails to load
    pub fn embedded() -> Self {
        match Self::from_toml(EMBEDDED_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                warn!("Embedded config invalid: {:?}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let popups = &self.popups;
        for ms in [popups.info_ms, popups.lifecycle_ms] {
            if ms == 0 || ms > MAX_POPUP_MS {
                return Err(ConfigError::InvalidValue);
            }
        }
        Ok(())
    }
}
