//! IoC Kernel
//!
//! Abstract building blocks of the dependency-resolution container: values,
//! behaviors, scopes, contract descriptors and the adapter proxy. The
//! executing container lives in `ioc-runtime`.

// value module
pub mod value;
pub use value::{Action, Value};

// resolver module
pub mod resolver;
pub use resolver::{Behavior, Resolver};

// scope module
pub mod scope;
pub use scope::Scope;

// built-in keys
pub mod keys;

// contract module
pub mod contract;
pub use contract::{Contract, Operation, OperationKind};

// adapter module
pub mod adapter;
pub use adapter::{
    AdapterDescriptor, AdapterFactory, AdapterInstance, DispatchBinding, DispatchEntry, Method,
    MethodTable, SynthesisBackend,
};

// backing objects
pub mod data;
pub use data::DataObject;

// error module
pub mod error;
pub use error::{
    IntoKernelReport, IocError, IocResult, KernelError, KernelResult, SynthesisError,
};

// config module
pub mod config;
pub use config::ContainerConfig;
