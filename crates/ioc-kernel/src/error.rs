//! Crate-level error types for `ioc-kernel`.
//!
//! Resolution paths use the flat [`IocError`] through [`IocResult`]; errors
//! raised inside a behavior travel back to the original `resolve` caller
//! untouched. Bootstrap paths (loading configuration, building a container)
//! use [`KernelError`] wrapped in an [`error_stack::Report`] so callers can
//! attach context while the error propagates.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ioc_kernel::error::{IntoKernelReport, KernelResult};
//! use error_stack::ResultExt;
//!
//! fn load() -> KernelResult<ContainerConfig> {
//!     ContainerConfig::from_file("ioc.toml")
//!         .into_report()
//!         .attach("loading ioc.toml")
//! }
//! ```

use thiserror::Error;
use uuid::Uuid;

/// Result alias used on every resolution path.
pub type IocResult<T> = Result<T, IocError>;

/// Errors surfaced by `resolve` and by the built-in behaviors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IocError {
    /// No scope between the current scope and the root defines the key.
    #[error("Dependency not found: '{key}'")]
    DependencyNotFound { key: String },

    /// `IoC.Scope.Parent` was asked for the parent of a parentless scope.
    #[error("Scope {scope} has no parent")]
    NoParent { scope: Uuid },

    /// A generated adapter operation outside the get/set/finish conventions was called.
    #[error("Operation '{operation}' is not supported by adapter for '{contract}'")]
    UnsupportedOperation { contract: String, operation: String },

    /// The synthesis backend could not produce an adapter.
    #[error("Adapter synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// A built-in was resolved with the wrong number or kind of arguments.
    #[error("Invalid arguments for '{key}': {reason}")]
    InvalidArguments { key: String, reason: String },

    /// A value did not hold the type the caller asked for.
    #[error("Type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },

    /// Nested resolutions on one thread went deeper than the configured limit.
    #[error("Resolution of '{key}' exceeded the maximum depth of {limit}")]
    ResolutionDepthExceeded { key: String, limit: usize },

    /// A built-in outlived the container that installed it.
    #[error("Container has been dropped")]
    ContainerDropped,

    /// Error raised by an application behavior.
    #[error(transparent)]
    Behavior(Box<dyn std::error::Error + Send + Sync>),
}

impl IocError {
    /// Wrap an application error so a behavior can return it.
    pub fn behavior<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Behavior(Box::new(err))
    }

    pub fn invalid_arguments(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// `true` for [`IocError::DependencyNotFound`] on exactly `key`.
    pub fn is_not_found(&self, key: &str) -> bool {
        matches!(self, Self::DependencyNotFound { key: k } if k == key)
    }
}

/// Failures of the adapter synthesis step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SynthesisError {
    /// The contract cannot be turned into an adapter (empty name, etc.).
    #[error("Invalid contract '{contract}': {reason}")]
    InvalidContract { contract: String, reason: String },

    /// Two operations on the contract share a name.
    #[error("Contract '{contract}' declares operation '{operation}' more than once")]
    DuplicateOperation { contract: String, operation: String },

    /// The backend failed to materialize the implementation.
    #[error("Backend '{backend}' failed for '{adapter}': {reason}")]
    Backend {
        backend: String,
        adapter: String,
        reason: String,
    },
}

/// Crate-level error type for bootstrap paths.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// An error from the resolution engine.
    #[error("IoC error: {0}")]
    Ioc(#[from] IocError),

    /// A configuration-related error (requires the `config` feature).
    #[cfg(feature = "config")]
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A low-level I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error described by a message string.
    #[error("{0}")]
    Internal(String),
}

impl From<SynthesisError> for KernelError {
    fn from(err: SynthesisError) -> Self {
        KernelError::Ioc(IocError::Synthesis(err))
    }
}

/// Convenience result alias using [`error_stack::Report`].
pub type KernelResult<T> = Result<T, error_stack::Report<KernelError>>;

/// Extension trait to lift any error convertible into [`KernelError`] into a [`KernelResult`].
pub trait IntoKernelReport<T> {
    /// Wrap the error in an `error_stack::Report`.
    fn into_report(self) -> KernelResult<T>;
}

impl<T, E> IntoKernelReport<T> for Result<T, E>
where
    E: Into<KernelError>,
{
    #[inline]
    fn into_report(self) -> KernelResult<T> {
        self.map_err(|e| error_stack::Report::new(e.into()))
    }
}
