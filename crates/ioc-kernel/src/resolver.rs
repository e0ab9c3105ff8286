//! The resolution interface and the behaviors bound to dependency keys.

use std::fmt;
use std::sync::Arc;

use crate::error::IocResult;
use crate::value::{Action, Value};

/// Anything that can resolve a dependency key.
///
/// The runtime container is the canonical implementation. Behaviors receive
/// a `&dyn Resolver` so they can resolve other keys while running.
pub trait Resolver: Send + Sync {
    /// Resolve `key` against the calling thread's current scope chain.
    fn resolve(&self, key: &str, args: &[Value]) -> IocResult<Value>;

    /// An owned handle for work that runs after `resolve` has returned,
    /// such as actions and adapter instances.
    fn handle(&self) -> Arc<dyn Resolver>;

    /// Resolve `key` and run the [`Action`] it returns.
    fn run(&self, key: &str, args: &[Value]) -> IocResult<()> {
        self.resolve(key, args)?.into_action()?.execute()
    }
}

type BehaviorFn = dyn Fn(&dyn Resolver, &[Value]) -> IocResult<Value> + Send + Sync;

/// The unit registered under a dependency key.
#[derive(Clone)]
pub struct Behavior(Arc<BehaviorFn>);

impl Behavior {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Resolver, &[Value]) -> IocResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A behavior that always returns clones of the same value.
    pub fn constant(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// A behavior that produces an [`Action`] from its arguments.
    pub fn action<F>(f: F) -> Self
    where
        F: Fn(&dyn Resolver, &[Value]) -> IocResult<Action> + Send + Sync + 'static,
    {
        Self::new(move |resolver, args| f(resolver, args).map(Value::from))
    }

    pub fn invoke(&self, resolver: &dyn Resolver, args: &[Value]) -> IocResult<Value> {
        (self.0)(resolver, args)
    }

    pub fn ptr_eq(&self, other: &Behavior) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Behavior(..)")
    }
}

impl From<Behavior> for Value {
    fn from(behavior: Behavior) -> Self {
        Value::new(behavior)
    }
}
