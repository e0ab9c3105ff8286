//! Adapter descriptors, the generic adapter proxy, and the synthesis backend interface.
//!
//! The synthesizer turns a [`Contract`] into an [`AdapterDescriptor`], hands
//! it to a [`SynthesisBackend`], and registers the returned
//! [`AdapterFactory`] under the adapter's derived name. Every
//! [`AdapterInstance`] produced by that factory forwards its calls to the
//! resolver it was built with.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::contract::{Contract, Operation, OperationKind};
use crate::error::{IocError, IocResult, SynthesisError};
use crate::keys::{self, Accessor};
use crate::resolver::Resolver;
use crate::value::Value;

/// What a generated operation does when called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchBinding {
    /// Resolve `key` with `[backing]` and return the result.
    Resolve { key: String },
    /// Resolve `key` with `[backing, args...]` and execute the returned action.
    ResolveAndRun { key: String },
    /// Resolve `key` with `[target]` and execute the returned action.
    Unregister { key: String, target: String },
    /// Fail with `UnsupportedOperation` without resolving anything.
    Unsupported,
}

/// One operation and its routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    pub operation: Operation,
    pub binding: DispatchBinding,
}

/// Everything a backend needs to materialize an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDescriptor {
    pub contract: Contract,
    pub adapter_name: String,
    pub entries: Vec<DispatchEntry>,
}

impl AdapterDescriptor {
    /// Validate `contract` and derive the dispatch table for `adapter_name`.
    ///
    /// # Errors
    /// - [`SynthesisError::InvalidContract`] for an empty contract name or an
    ///   adapter name with nothing before the suffix
    /// - [`SynthesisError::DuplicateOperation`] when two operations share a name
    pub fn from_contract(
        contract: &Contract,
        adapter_name: impl Into<String>,
        suffix: &str,
    ) -> Result<Self, SynthesisError> {
        let adapter_name = adapter_name.into();
        if contract.name.trim().is_empty() {
            return Err(SynthesisError::InvalidContract {
                contract: contract.name.clone(),
                reason: "contract name is empty".to_string(),
            });
        }
        if adapter_name.is_empty() || adapter_name == suffix {
            return Err(SynthesisError::InvalidContract {
                contract: contract.name.clone(),
                reason: format!("cannot derive an adapter name (got '{adapter_name}')"),
            });
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(contract.operations.len());
        for operation in &contract.operations {
            if !seen.insert(operation.name.as_str()) {
                return Err(SynthesisError::DuplicateOperation {
                    contract: contract.name.clone(),
                    operation: operation.name.clone(),
                });
            }
            let binding = match &operation.kind {
                OperationKind::Get { attribute } => DispatchBinding::Resolve {
                    key: keys::accessor_key(&contract.name, attribute, Accessor::Get),
                },
                OperationKind::Set { attribute } => DispatchBinding::ResolveAndRun {
                    key: keys::accessor_key(&contract.name, attribute, Accessor::Set),
                },
                OperationKind::Finish => DispatchBinding::Unregister {
                    key: keys::UNREGISTER.to_string(),
                    target: adapter_name.clone(),
                },
                OperationKind::Unsupported => DispatchBinding::Unsupported,
            };
            entries.push(DispatchEntry {
                operation: operation.clone(),
                binding,
            });
        }

        Ok(Self {
            contract: contract.clone(),
            adapter_name,
            entries,
        })
    }

    pub fn entry(&self, operation: &str) -> Option<&DispatchEntry> {
        self.entries.iter().find(|e| e.operation.name == operation)
    }
}

type MethodFn = dyn Fn(&dyn Resolver, &Value, &[Value]) -> IocResult<Value> + Send + Sync;

/// A materialized operation: `(resolver, backing, args) -> result`.
#[derive(Clone)]
pub struct Method(Arc<MethodFn>);

impl Method {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Resolver, &Value, &[Value]) -> IocResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, resolver: &dyn Resolver, backing: &Value, args: &[Value]) -> IocResult<Value> {
        (self.0)(resolver, backing, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

/// Method table shared by every instance of one materialized adapter.
pub type MethodTable = Arc<HashMap<String, Method>>;

/// A live adapter bound to one backing object.
///
/// Implement the application's own trait on top of [`AdapterInstance::invoke`]
/// (or [`get`](Self::get) / [`set`](Self::set) / [`finish`](Self::finish)) to
/// use it through a typed interface.
#[derive(Clone)]
pub struct AdapterInstance {
    resolver: Arc<dyn Resolver>,
    backing: Value,
    descriptor: Arc<AdapterDescriptor>,
    methods: MethodTable,
}

impl AdapterInstance {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        backing: Value,
        descriptor: Arc<AdapterDescriptor>,
        methods: MethodTable,
    ) -> Self {
        Self {
            resolver,
            backing,
            descriptor,
            methods,
        }
    }

    pub fn adapter_name(&self) -> &str {
        &self.descriptor.adapter_name
    }

    pub fn contract_name(&self) -> &str {
        &self.descriptor.contract.name
    }

    pub fn descriptor(&self) -> &AdapterDescriptor {
        &self.descriptor
    }

    pub fn backing(&self) -> &Value {
        &self.backing
    }

    /// Operation names in contract order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.descriptor
            .entries
            .iter()
            .map(|e| e.operation.name.as_str())
    }

    /// Call a contract operation by name.
    pub fn invoke(&self, operation: &str, args: &[Value]) -> IocResult<Value> {
        match self.methods.get(operation) {
            Some(method) => method.call(self.resolver.as_ref(), &self.backing, args),
            None => Err(self.unsupported(operation)),
        }
    }

    /// Call the getter for `attribute` (matched case-insensitively).
    pub fn get(&self, attribute: &str) -> IocResult<Value> {
        let name = self.find(|kind| {
            matches!(kind, OperationKind::Get { attribute: a } if a.eq_ignore_ascii_case(attribute))
        });
        match name {
            Some(name) => self.invoke(&name, &[]),
            None => Err(self.unsupported(&format!("get{attribute}"))),
        }
    }

    /// Call the setter for `attribute` (matched case-insensitively).
    pub fn set(&self, attribute: &str, value: Value) -> IocResult<()> {
        let name = self.find(|kind| {
            matches!(kind, OperationKind::Set { attribute: a } if a.eq_ignore_ascii_case(attribute))
        });
        match name {
            Some(name) => self.invoke(&name, &[value]).map(|_| ()),
            None => Err(self.unsupported(&format!("set{attribute}"))),
        }
    }

    /// Run the contract's finish operation.
    pub fn finish(&self) -> IocResult<()> {
        match self.find(|kind| matches!(kind, OperationKind::Finish)) {
            Some(name) => self.invoke(&name, &[]).map(|_| ()),
            None => Err(self.unsupported("finish")),
        }
    }

    fn find(&self, pred: impl Fn(&OperationKind) -> bool) -> Option<String> {
        self.descriptor
            .entries
            .iter()
            .find(|e| pred(&e.operation.kind))
            .map(|e| e.operation.name.clone())
    }

    fn unsupported(&self, operation: &str) -> IocError {
        IocError::UnsupportedOperation {
            contract: self.descriptor.contract.name.clone(),
            operation: operation.to_string(),
        }
    }
}

impl fmt::Debug for AdapterInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterInstance")
            .field("adapter", &self.descriptor.adapter_name)
            .field("contract", &self.descriptor.contract.name)
            .finish()
    }
}

type FactoryFn = dyn Fn(Arc<dyn Resolver>, Value) -> IocResult<AdapterInstance> + Send + Sync;

/// Constructs adapter instances bound to a backing object.
#[derive(Clone)]
pub struct AdapterFactory(Arc<FactoryFn>);

impl AdapterFactory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Arc<dyn Resolver>, Value) -> IocResult<AdapterInstance> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn construct(&self, resolver: Arc<dyn Resolver>, backing: Value) -> IocResult<AdapterInstance> {
        (self.0)(resolver, backing)
    }
}

impl fmt::Debug for AdapterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdapterFactory(..)")
    }
}

/// Turns an [`AdapterDescriptor`] into a loadable implementation.
///
/// Calls are synchronous. A backend may fail; the failure aborts the whole
/// `Adapter` resolution and nothing is registered.
pub trait SynthesisBackend: Send + Sync {
    /// Backend identifier used in logs and errors.
    fn name(&self) -> &str;

    fn materialize(&self, descriptor: Arc<AdapterDescriptor>) -> Result<AdapterFactory, SynthesisError>;
}
