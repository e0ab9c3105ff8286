//! Type-erased values passed to and returned from behaviors.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{IocError, IocResult};

/// A shared, type-erased value.
///
/// Cloning is cheap and preserves identity: two clones compare equal under
/// [`Value::ptr_eq`]. Values wrapping an `Arc<T>` (see [`Value::from_arc`])
/// hand the very same `Arc<T>` back from [`Value::downcast`].
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Wrap an existing `Arc` without re-allocating, keeping its identity.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(value)
    }

    /// The value returned by behaviors that have nothing to return.
    pub fn unit() -> Self {
        Self::new(())
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn is_unit(&self) -> bool {
        self.is::<()>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Extract the shared inner value.
    ///
    /// # Errors
    /// [`IocError::TypeMismatch`] when the value does not hold a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> IocResult<Arc<T>> {
        self.0.clone().downcast::<T>().map_err(|_| IocError::TypeMismatch {
            expected: type_name::<T>(),
        })
    }

    /// Read a string argument given either as `String` or `&'static str`.
    pub fn as_str(&self) -> Option<&str> {
        self.downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| self.downcast_ref::<&'static str>().copied())
    }

    /// Extract an [`Action`] from a behavior result.
    pub fn into_action(self) -> IocResult<Action> {
        self.downcast_ref::<Action>()
            .cloned()
            .ok_or(IocError::TypeMismatch {
                expected: type_name::<Action>(),
            })
    }

    pub fn ptr_eq(&self, other: &Value) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.as_str() {
            return f.debug_tuple("Value").field(&s).finish();
        }
        f.write_str("Value(..)")
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<Action> for Value {
    fn from(action: Action) -> Self {
        Self::new(action)
    }
}

/// A deferred, argument-less side effect returned by some behaviors.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() -> IocResult<()> + Send + Sync>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> IocResult<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// An action that does nothing.
    pub fn noop() -> Self {
        Self::new(|| Ok(()))
    }

    pub fn execute(&self) -> IocResult<()> {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}
