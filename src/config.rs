//! Configuration for the sampling context
//!
//! [`WatchConfig`] gathers everything that is decided before sampling
//! starts: the chip variant, the sampling mode, the packet byte budget and
//! the rate bounds. Defaults match the wire contract expected by existing
//! observer apps. Configs can be persisted as JSON, and missing fields fall
//! back to their defaults so old files keep loading as new fields appear.

use crate::error::{PinWatchError, Result};
use crate::target::Target;
use crate::transport::DEFAULT_DEVICE_NAME;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default sampling interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u32 = 500;

/// Smallest accepted sampling interval in milliseconds
pub const DEFAULT_RATE_MIN_MS: u32 = 50;

/// Largest accepted sampling interval in milliseconds
pub const DEFAULT_RATE_MAX_MS: u32 = 60_000;

/// Target byte budget for one telemetry packet
pub const DEFAULT_CHUNK_LIMIT: usize = 240;

/// How the sampling driver is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SamplingMode {
    /// A background thread samples on its own timer
    #[default]
    Autonomous,
    /// The application calls [`crate::PinWatch::poll`] from its own loop
    Polled,
}

/// Static configuration for a [`crate::PinWatch`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
    /// Advertised device name
    #[serde(default = "default_device_name")]
    pub device_name: String,

    /// Chip variant, drives the safe-pin and DAC tables
    #[serde(default)]
    pub target: Target,

    /// Scheduling mode, fixed for the lifetime of the context
    #[serde(default)]
    pub mode: SamplingMode,

    /// Initial sampling interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u32,

    /// Smallest interval a rate request may set
    #[serde(default = "default_rate_min_ms")]
    pub rate_min_ms: u32,

    /// Largest interval a rate request may set
    #[serde(default = "default_rate_max_ms")]
    pub rate_max_ms: u32,

    /// Target byte budget per packet (soft limit)
    #[serde(default = "default_chunk_limit")]
    pub chunk_limit: usize,

    /// Whether to include the chip temperature in packet headers
    #[serde(default = "default_true")]
    pub report_temperature: bool,
}

fn default_device_name() -> String {
    DEFAULT_DEVICE_NAME.to_string()
}

fn default_interval_ms() -> u32 {
    DEFAULT_INTERVAL_MS
}

fn default_rate_min_ms() -> u32 {
    DEFAULT_RATE_MIN_MS
}

fn default_rate_max_ms() -> u32 {
    DEFAULT_RATE_MAX_MS
}

fn default_chunk_limit() -> usize {
    DEFAULT_CHUNK_LIMIT
}

fn default_true() -> bool {
    true
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            target: Target::default(),
            mode: SamplingMode::default(),
            interval_ms: DEFAULT_INTERVAL_MS,
            rate_min_ms: DEFAULT_RATE_MIN_MS,
            rate_max_ms: DEFAULT_RATE_MAX_MS,
            chunk_limit: DEFAULT_CHUNK_LIMIT,
            report_temperature: true,
        }
    }
}

impl WatchConfig {
    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PinWatchError::Config(format!("Failed to read {:?}: {}", path, e)))?;

        serde_json::from_str(&content)
            .map_err(|e| PinWatchError::Config(format!("Failed to parse {:?}: {}", path, e)))
    }

    /// Load a config, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PinWatchError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| PinWatchError::Config(format!("Failed to write {:?}: {}", path, e)))
    }
}
