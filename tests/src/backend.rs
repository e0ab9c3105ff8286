//! Mock synthesis backends.

use std::sync::Arc;

use ioc_kernel::{AdapterDescriptor, AdapterFactory, SynthesisBackend, SynthesisError};
use ioc_runtime::DispatchTableBackend;
use parking_lot::Mutex;

/// A backend that refuses every descriptor.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    reason: String,
}

impl FailingBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SynthesisBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn materialize(&self, descriptor: Arc<AdapterDescriptor>) -> Result<AdapterFactory, SynthesisError> {
        Err(SynthesisError::Backend {
            backend: self.name().to_string(),
            adapter: descriptor.adapter_name.clone(),
            reason: self.reason.clone(),
        })
    }
}

/// Delegates to [`DispatchTableBackend`] and records every descriptor it sees.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: DispatchTableBackend,
    /// Every descriptor passed to `materialize`, in call order.
    pub history: Arc<Mutex<Vec<Arc<AdapterDescriptor>>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.history.lock().len()
    }

    pub fn adapter_names(&self) -> Vec<String> {
        self.history
            .lock()
            .iter()
            .map(|d| d.adapter_name.clone())
            .collect()
    }
}

impl SynthesisBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn materialize(&self, descriptor: Arc<AdapterDescriptor>) -> Result<AdapterFactory, SynthesisError> {
        self.history.lock().push(descriptor.clone());
        self.inner.materialize(descriptor)
    }
}
