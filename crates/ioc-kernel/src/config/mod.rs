//! Container configuration.
//!
//! [`ContainerConfig`] is always available. With the `config` feature this
//! module also provides the file loader: format detection from the file
//! extension (YAML, TOML, JSON, INI, RON, JSON5), `${VAR}` / `$VAR`
//! environment substitution, layered merging, and prefixed environment
//! overrides.
//!
//! ```toml
//! [resolution]
//! max_depth = 128
//! log_resolutions = false
//!
//! [adapter]
//! suffix = "Adapter"
//! strip_leading_char = true
//! ```

use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
mod loader;
#[cfg(feature = "config")]
pub use loader::*;

/// Default nesting limit for resolutions on one thread.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default suffix appended to derived adapter names.
pub const DEFAULT_ADAPTER_SUFFIX: &str = "Adapter";

/// Environment prefix for overrides, e.g. `IOC_RESOLUTION__MAX_DEPTH=64`.
pub const ENV_PREFIX: &str = "IOC";

/// Resolution engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Maximum nested resolutions per thread; `0` disables the guard.
    pub max_depth: usize,
    /// Log every resolution at `debug` instead of `trace`.
    pub log_resolutions: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            log_resolutions: false,
        }
    }
}

/// Adapter naming settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub suffix: String,
    /// Drop the contract's leading qualifying character (`IMovable` → `Movable`).
    pub strip_leading_char: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_ADAPTER_SUFFIX.to_string(),
            strip_leading_char: true,
        }
    }
}

/// Top-level container configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub resolution: ResolutionConfig,
    pub adapter: AdapterConfig,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.resolution.max_depth = max_depth;
        self
    }

    pub fn with_log_resolutions(mut self, enabled: bool) -> Self {
        self.resolution.log_resolutions = enabled;
        self
    }

    pub fn with_adapter_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.adapter.suffix = suffix.into();
        self
    }

    pub fn with_strip_leading_char(mut self, strip: bool) -> Self {
        self.adapter.strip_leading_char = strip;
        self
    }
}
