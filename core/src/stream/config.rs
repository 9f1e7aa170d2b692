//! stream/config.rs
//! Writer configuration.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::constants::{APPLICATION_ID, DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_CONTAINER_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Uncompressed bytes per log container.
    pub max_container_size: usize,
    /// zlib level, 0..=9.
    pub compression_level: u32,
    /// Stamped into the file header.
    pub application_id: u8,
    /// 0-based channel for messages that do not carry one.
    pub default_channel: u16,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_container_size: DEFAULT_MAX_CONTAINER_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            application_id: APPLICATION_ID,
            default_channel: 0,
        }
    }
}

impl WriterConfig {
    pub fn with_max_container_size(mut self, size: usize) -> Self {
        self.max_container_size = size;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_default_channel(mut self, channel: u16) -> Self {
        self.default_channel = channel;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_container_size == 0 {
            return Err(ConfigError::ZeroContainerSize);
        }
        if self.max_container_size > u32::MAX as usize {
            return Err(ConfigError::ContainerSizeTooLarge { have: self.max_container_size });
        }
        if self.compression_level > 9 {
            return Err(ConfigError::InvalidCompressionLevel { have: self.compression_level });
        }
        Ok(())
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: WriterConfig = serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ZeroContainerSize,
    ContainerSizeTooLarge { have: usize },
    InvalidCompressionLevel { have: u32 },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConfigError::*;
        match self {
            ZeroContainerSize => write!(f, "max_container_size must be non-zero"),
            ContainerSizeTooLarge { have } => write!(f, "max_container_size too large: {}", have),
            InvalidCompressionLevel { have } => write!(f, "invalid compression level: {} > 9", have),
            Parse(msg) => write!(f, "invalid writer config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_defaults() {
        let cfg = WriterConfig::from_json_str(r#"{ "max_container_size": 4096 }"#).unwrap();
        assert_eq!(cfg.max_container_size, 4096);
        assert_eq!(cfg.compression_level, DEFAULT_COMPRESSION_LEVEL);
        assert_eq!(cfg.application_id, APPLICATION_ID);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            WriterConfig::default().with_max_container_size(0).validate(),
            Err(ConfigError::ZeroContainerSize)
        ));
        assert!(matches!(
            WriterConfig::from_json_str(r#"{ "compression_level": 12 }"#),
            Err(ConfigError::InvalidCompressionLevel { have: 12 })
        ));
        assert!(matches!(WriterConfig::from_json_str("not json"), Err(ConfigError::Parse(_))));
    }
}
