//! Configuration system
//!
//! Settings are plain serde structs loaded from TOML or RON; the format is
//! picked from the file extension.

pub use serde::{Deserialize, Serialize};

use crate::audio::{AudioBackendConfig, FadeCurve, SlotTemplate};
use std::path::Path;

/// Shortest sweep interval accepted, in seconds
pub const MIN_SWEEP_INTERVAL: f32 = 0.01;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        format.parse(&contents)
    }

    /// Save configuration to file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = ConfigFormat::from_path(path)?.render(self)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse a config from text
    pub fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Self::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Render a config as text
    pub fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Self::Toml => {
                toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Playback pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Seconds between sweeps of finished slots
    pub sweep_interval_secs: f32,
    /// Curve used for fade-outs
    pub fade_curve: FadeCurve,
    /// Volume new slots start at (0.0 to 1.0)
    pub default_volume: f32,
    /// Audio output settings
    pub backend: AudioBackendConfig,
}

impl PoolConfig {
    /// Sweep interval, kept above [`MIN_SWEEP_INTERVAL`]
    pub fn sweep_interval(&self) -> f32 {
        if self.sweep_interval_secs.is_nan() {
            return Self::default().sweep_interval_secs;
        }
        self.sweep_interval_secs.max(MIN_SWEEP_INTERVAL)
    }

    /// Template for new slots
    pub fn slot_template(&self) -> SlotTemplate {
        SlotTemplate::default()
            .with_volume(self.default_volume)
            .with_fade_curve(self.fade_curve)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 1.0,
            fade_curve: FadeCurve::Legacy,
            default_volume: 1.0,
            backend: AudioBackendConfig::default(),
        }
    }
}

impl Config for PoolConfig {}
