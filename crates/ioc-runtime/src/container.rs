//! The resolution engine.
//!
//! A [`Container`] owns one root scope holding the built-in keys. Each thread
//! resolves against its own current scope (the root until the thread switches
//! with `IoC.Scope.Current.Set`) and walks parent links until a scope binds
//! the key.
//!
//! # Example
//!
//! ```rust
//! use ioc_runtime::{Behavior, Container, Value};
//!
//! let container = Container::new();
//! container
//!     .register("Greeting", Behavior::constant(Value::from("hello")))
//!     .unwrap();
//!
//! let greeting = container.resolve("Greeting", &[]).unwrap();
//! assert_eq!(greeting.as_str(), Some("hello"));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use ioc_kernel::keys;
use ioc_kernel::{
    Action, AdapterInstance, Behavior, ContainerConfig, Contract, IocError, IocResult, Resolver,
    Scope, SynthesisBackend, Value,
};
use parking_lot::Mutex;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::builder::ContainerBuilder;
use crate::builtins;
use crate::context::{self, DepthGuard};

pub(crate) struct ContainerInner {
    pub(crate) id: Uuid,
    pub(crate) root: Arc<Scope>,
    pub(crate) config: ContainerConfig,
    pub(crate) backend: Arc<dyn SynthesisBackend>,
    generation: AtomicU64,
    reset_lock: Mutex<()>,
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        // Other threads prune their bindings on their next bind or lookup.
        context::unbind(self.id);
        debug!(container = %self.id, "container dropped");
    }
}

/// Handle to a dependency-resolution container.
///
/// Cloning is cheap; clones share the root scope and per-thread bindings.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// A container with default configuration and the dispatch-table backend.
    pub fn new() -> Self {
        ContainerBuilder::new().build()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_parts(config: ContainerConfig, backend: Arc<dyn SynthesisBackend>) -> Self {
        let inner = Arc::new(ContainerInner {
            id: Uuid::new_v4(),
            root: Scope::empty(),
            config,
            backend,
            generation: AtomicU64::new(0),
            reset_lock: Mutex::new(()),
        });
        builtins::install(&inner);
        info!(
            container = %inner.id,
            backend = inner.backend.name(),
            "container initialized"
        );
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ContainerInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<ContainerInner>) -> IocResult<Self> {
        weak.upgrade()
            .map(|inner| Self { inner })
            .ok_or(IocError::ContainerDropped)
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    pub fn backend_name(&self) -> &str {
        self.inner.backend.name()
    }

    pub(crate) fn backend(&self) -> &Arc<dyn SynthesisBackend> {
        &self.inner.backend
    }

    pub fn root_scope(&self) -> Arc<Scope> {
        self.inner.root.clone()
    }

    pub fn is_root(&self, scope: &Scope) -> bool {
        std::ptr::eq(scope, Arc::as_ptr(&self.inner.root))
    }

    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// The calling thread's current scope, read directly from the thread context.
    pub(crate) fn bound_scope(&self) -> Arc<Scope> {
        context::current(self.inner.id, self.generation()).unwrap_or_else(|| self.root_scope())
    }

    /// Point the calling thread at `scope`.
    pub(crate) fn bind_current(&self, scope: Arc<Scope>) {
        debug!(container = %self.inner.id, scope = %scope.id(), "current scope set");
        context::bind(self.downgrade(), self.inner.id, self.generation(), scope);
    }

    /// Resolve `key` from the calling thread's current scope outwards.
    ///
    /// # Errors
    /// - [`IocError::DependencyNotFound`] when no scope in the chain binds `key`
    /// - [`IocError::ResolutionDepthExceeded`] when nested resolutions pass the configured limit
    /// - any error returned by the bound behavior, unchanged
    pub fn resolve(&self, key: &str, args: &[Value]) -> IocResult<Value> {
        let limit = self.inner.config.resolution.max_depth;
        let Some(_guard) = DepthGuard::enter(limit) else {
            debug!(key, limit, "resolution depth exceeded");
            return Err(IocError::ResolutionDepthExceeded {
                key: key.to_string(),
                limit,
            });
        };

        let start = self.bound_scope();
        let Some((scope, behavior)) = start.lookup(key) else {
            debug!(key, scope = %start.id(), "dependency not found");
            return Err(IocError::DependencyNotFound {
                key: key.to_string(),
            });
        };

        if self.inner.config.resolution.log_resolutions {
            debug!(key, scope = %scope.id(), args = args.len(), "resolving");
        } else {
            trace!(key, scope = %scope.id(), args = args.len(), "resolving");
        }
        behavior.invoke(self, args)
    }

    /// Resolve `key` and downcast the result.
    pub fn resolve_as<T: std::any::Any + Send + Sync>(&self, key: &str, args: &[Value]) -> IocResult<Arc<T>> {
        self.resolve(key, args)?.downcast::<T>()
    }

    /// Resolve `key` and return the [`Action`] it produced, without running it.
    pub fn resolve_action(&self, key: &str, args: &[Value]) -> IocResult<Action> {
        self.resolve(key, args)?.into_action()
    }

    /// `IoC.Register` into the current scope, executed immediately.
    pub fn register(&self, key: impl Into<String>, behavior: Behavior) -> IocResult<()> {
        self.resolve_action(keys::REGISTER, &[Value::from(key.into()), behavior.into()])?
            .execute()
    }

    /// `IoC.Unregister` from the current scope, executed immediately.
    pub fn unregister(&self, key: impl Into<String>) -> IocResult<()> {
        self.resolve_action(keys::UNREGISTER, &[Value::from(key.into())])?
            .execute()
    }

    /// `IoC.Scope.Current`
    pub fn current_scope(&self) -> IocResult<Arc<Scope>> {
        self.resolve_as::<Scope>(keys::SCOPE_CURRENT, &[])
    }

    /// `IoC.Scope.Current.Set`, executed immediately on this thread.
    pub fn set_current_scope(&self, scope: Arc<Scope>) -> IocResult<()> {
        self.resolve_action(keys::SCOPE_CURRENT_SET, &[Value::from_arc(scope)])?
            .execute()
    }

    /// `IoC.Scope.Create` with the current scope as parent.
    pub fn create_scope(&self) -> IocResult<Arc<Scope>> {
        self.resolve_as::<Scope>(keys::SCOPE_CREATE, &[])
    }

    /// `IoC.Scope.Create` with an explicit parent.
    pub fn create_scope_with_parent(&self, parent: Arc<Scope>) -> IocResult<Arc<Scope>> {
        self.resolve_as::<Scope>(keys::SCOPE_CREATE, &[Value::from_arc(parent)])
    }

    /// `IoC.Scope.Create.Empty`
    pub fn create_empty_scope(&self) -> IocResult<Arc<Scope>> {
        self.resolve_as::<Scope>(keys::SCOPE_CREATE_EMPTY, &[])
    }

    /// `IoC.Scope.Parent` of `scope`, or of the current scope when `None`.
    pub fn parent_scope(&self, scope: Option<Arc<Scope>>) -> IocResult<Arc<Scope>> {
        let args: Vec<Value> = scope.into_iter().map(Value::from_arc).collect();
        self.resolve_as::<Scope>(keys::SCOPE_PARENT, &args)
    }

    /// `IoC.Scope.Current.Clear`, executed immediately.
    pub fn clear_scope(&self, scope: Arc<Scope>) -> IocResult<()> {
        self.resolve_action(keys::SCOPE_CURRENT_CLEAR, &[Value::from_arc(scope)])?
            .execute()
    }

    /// `Adapter`: synthesize an adapter for `contract` bound to `backing`.
    pub fn adapter(&self, contract: Contract, backing: Value) -> IocResult<Arc<AdapterInstance>> {
        self.resolve_as::<AdapterInstance>(keys::ADAPTER, &[Value::new(contract), backing])
    }

    /// Restore the freshly-initialized state.
    ///
    /// The root scope is emptied and refilled with exactly the built-in keys,
    /// and every thread's current-scope binding is invalidated so all
    /// threads resolve from the root again. Intended for test isolation;
    /// resolutions racing with a reset may miss built-ins.
    pub fn reset(&self) {
        let _lock = self.inner.reset_lock.lock();
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.root.clear();
        builtins::install(&self.inner);
        context::unbind(self.inner.id);
        info!(container = %self.inner.id, "container reset");
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for Container {
    fn resolve(&self, key: &str, args: &[Value]) -> IocResult<Value> {
        Container::resolve(self, key, args)
    }

    fn handle(&self) -> Arc<dyn Resolver> {
        Arc::new(self.clone())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.inner.id)
            .field("root_len", &self.inner.root.len())
            .field("backend", &self.inner.backend.name())
            .finish()
    }
}
