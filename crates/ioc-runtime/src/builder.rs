//! Fluent construction of [`Container`]s.

use std::path::Path;
use std::sync::Arc;

use error_stack::ResultExt;
use ioc_kernel::config::FileFormat;
use ioc_kernel::{ContainerConfig, IntoKernelReport, KernelResult, SynthesisBackend};

use crate::backend::DispatchTableBackend;
use crate::container::Container;

/// Container builder.
///
/// ```rust
/// use ioc_runtime::ContainerBuilder;
///
/// let container = ContainerBuilder::new()
///     .with_max_depth(32)
///     .with_adapter_suffix("Proxy")
///     .build();
/// assert_eq!(container.config().resolution.max_depth, 32);
/// ```
pub struct ContainerBuilder {
    config: ContainerConfig,
    backend: Option<Arc<dyn SynthesisBackend>>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            backend: None,
        }
    }

    /// Start from a configuration file; `IOC_*` environment variables override it.
    pub fn from_config_file(path: impl AsRef<Path>) -> KernelResult<Self> {
        let path = path.as_ref();
        let config = ContainerConfig::from_file(path)
            .into_report()
            .attach(format!("loading container config from {}", path.display()))?;
        Ok(Self::new().with_config(config))
    }

    pub fn from_config_str(content: &str, format: FileFormat) -> KernelResult<Self> {
        let config = ContainerConfig::from_str_with_format(content, format)
            .into_report()
            .attach(format!("parsing inline {format:?} container config"))?;
        Ok(Self::new().with_config(config))
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Maximum nested resolutions per thread (`0` disables the guard).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.resolution.max_depth = max_depth;
        self
    }

    /// Log every resolution at `debug` instead of `trace`.
    pub fn with_log_resolutions(mut self, enabled: bool) -> Self {
        self.config.resolution.log_resolutions = enabled;
        self
    }

    pub fn with_adapter_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.adapter.suffix = suffix.into();
        self
    }

    pub fn with_strip_leading_char(mut self, strip: bool) -> Self {
        self.config.adapter.strip_leading_char = strip;
        self
    }

    /// Replace the default [`DispatchTableBackend`].
    pub fn with_backend(mut self, backend: Arc<dyn SynthesisBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> Container {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(DispatchTableBackend::new()));
        Container::from_parts(self.config, backend)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
