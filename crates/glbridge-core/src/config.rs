//! Configuration for the glbridge runtime.
//!
//! Everything has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [window.size_limits]
//! min_width = 32
//! max_width = 1024
//! min_height = 32
//! max_height = 1024
//!
//! [handshake]
//! attempt_timeout_ms = 100
//! max_attempts = 50
//!
//! [logging]
//! filter = "info,glbridge=trace"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Environment variable naming a TOML file to load with [`BridgeConfig::from_env`].
pub const CONFIG_ENV_VAR: &str = "GLBRIDGE_CONFIG";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid size limits: {0}")]
    InvalidSizeLimits(String),

    #[error("Invalid handshake settings: {0}")]
    InvalidHandshake(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub window: WindowConfig,
    pub handshake: HandshakeConfig,
    pub logging: LoggingConfig,
    pub profiling: ProfilingConfig,
}

impl BridgeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from the file named by `GLBRIDGE_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(limits) = &self.window.size_limits {
            limits.validate()?;
        }
        self.handshake.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Fixed min/max window size. `None` leaves sizing to the toolkit.
    pub size_limits: Option<SizeLimits>,
}

/// Inclusive bounds on the window content size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl SizeLimits {
    pub const fn new(min_width: u32, max_width: u32, min_height: u32, max_height: u32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width == 0 || self.min_height == 0 {
            return Err(ConfigError::InvalidSizeLimits(format!(
                "minimum size must be nonzero, got {}x{}",
                self.min_width, self.min_height
            )));
        }
        if self.min_width > self.max_width || self.min_height > self.max_height {
            return Err(ConfigError::InvalidSizeLimits(format!(
                "minimum {}x{} exceeds maximum {}x{}",
                self.min_width, self.min_height, self.max_width, self.max_height
            )));
        }
        Ok(())
    }

    pub fn min_size(&self) -> Size<u32> {
        Size::new(self.min_width, self.min_height)
    }

    pub fn max_size(&self) -> Size<u32> {
        Size::new(self.max_width, self.max_height)
    }

    pub fn clamp(&self, size: Size<u32>) -> Size<u32> {
        Size::new(
            size.width.clamp(self.min_width, self.max_width),
            size.height.clamp(self.min_height, self.max_height),
        )
    }
}

/// Bounds on how long teardown waits for the renderer to acknowledge quitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    pub attempt_timeout_ms: u64,
    pub max_attempts: u32,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: 100,
            max_attempts: 50,
        }
    }
}

impl HandshakeConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidHandshake(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ConfigError::InvalidHandshake(
                "attempt_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives. `RUST_LOG` still takes precedence.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilingConfig {
    pub enabled: bool,
    pub address: String,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "127.0.0.1:8585".to_string(),
        }
    }
}
