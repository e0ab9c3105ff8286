// =============================================================================
// IoC Runtime - Resolution Engine, Thread-Bound Scopes and Adapter Synthesis
// =============================================================================
//
// This crate executes the abstractions defined in `ioc-kernel`. It depends
// only on the kernel for values, behaviors, scopes and contract descriptors.
//
// Main Components:
// - Container: resolves keys against the calling thread's current scope
// - ContainerBuilder: fluent construction, optionally from a config file
// - DispatchTableBackend: default adapter synthesis backend
//
// =============================================================================

pub mod backend;
pub mod builder;
pub mod container;

mod builtins;
mod context;
mod synthesizer;

pub use backend::DispatchTableBackend;
pub use builder::ContainerBuilder;
pub use container::Container;

// =============================================================================
// Re-exports from Kernel
// =============================================================================
//
// Callers of the runtime work with these kernel types directly: behaviors and
// values to register and resolve, scopes to switch between, and contracts to
// synthesize adapters from.
// =============================================================================

pub use ioc_kernel::keys;
pub use ioc_kernel::{
    Action, AdapterDescriptor, AdapterFactory, AdapterInstance, Behavior, ContainerConfig,
    Contract, DataObject, IocError, IocResult, KernelError, KernelResult, Operation,
    OperationKind, Resolver, Scope, SynthesisBackend, SynthesisError, Value,
};
