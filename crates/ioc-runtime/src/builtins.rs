//! Built-in behaviors installed into every root scope.
//!
//! Each behavior holds only a weak reference to its container; the root
//! scope is owned by the container, so a strong reference here would keep
//! both alive forever.

use std::sync::{Arc, Weak};

use ioc_kernel::keys;
use ioc_kernel::{Action, Behavior, Contract, IocError, IocResult, Scope, Value};
use tracing::debug;

use crate::container::{Container, ContainerInner};
use crate::synthesizer;

pub(crate) fn install(inner: &Arc<ContainerInner>) {
    let weak = Arc::downgrade(inner);
    let root = &inner.root;

    root.insert(keys::REGISTER, register(weak.clone()));
    root.insert(keys::UNREGISTER, unregister(weak.clone()));
    root.insert(keys::SCOPE_CREATE, scope_create(weak.clone()));
    root.insert(keys::SCOPE_CREATE_EMPTY, scope_create_empty());
    root.insert(keys::SCOPE_CURRENT, scope_current(weak.clone()));
    root.insert(keys::SCOPE_CURRENT_SET, scope_current_set(weak.clone()));
    root.insert(keys::SCOPE_CURRENT_CLEAR, scope_current_clear(weak.clone()));
    root.insert(keys::SCOPE_PARENT, scope_parent(weak.clone()));
    root.insert(keys::ADAPTER, adapter(weak));
}

// ============================================================================
// Argument helpers
// ============================================================================

fn arity(key: &str, args: &[Value], allowed: std::ops::RangeInclusive<usize>) -> IocResult<()> {
    if allowed.contains(&args.len()) {
        return Ok(());
    }
    let expected = if allowed.start() == allowed.end() {
        allowed.start().to_string()
    } else {
        format!("{} to {}", allowed.start(), allowed.end())
    };
    Err(IocError::invalid_arguments(
        key,
        format!("expected {expected} argument(s), got {}", args.len()),
    ))
}

fn string_arg(key: &str, value: &Value) -> IocResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| IocError::invalid_arguments(key, "dependency key must be a string"))
}

fn scope_arg(value: &Value) -> IocResult<Arc<Scope>> {
    value.downcast::<Scope>()
}

// ============================================================================
// Registration
// ============================================================================

/// `(key, behavior)` → action inserting into the scope current at resolution time.
fn register(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::action(move |_, args| {
        arity(keys::REGISTER, args, 2..=2)?;
        let key = string_arg(keys::REGISTER, &args[0])?;
        let behavior = args[1]
            .downcast_ref::<Behavior>()
            .cloned()
            .ok_or_else(|| {
                IocError::invalid_arguments(keys::REGISTER, "second argument must be a Behavior")
            })?;
        let scope = Container::upgrade(&weak)?.bound_scope();

        Ok(Action::new(move || {
            let replaced = scope.insert(key.clone(), behavior.clone());
            debug!(key = %key, scope = %scope.id(), replaced, "dependency registered");
            Ok(())
        }))
    })
}

/// `(key)` → action removing from the scope current at resolution time.
fn unregister(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::action(move |_, args| {
        arity(keys::UNREGISTER, args, 1..=1)?;
        let key = string_arg(keys::UNREGISTER, &args[0])?;
        let scope = Container::upgrade(&weak)?.bound_scope();

        Ok(Action::new(move || {
            let removed = scope.remove(&key).is_some();
            debug!(key = %key, scope = %scope.id(), removed, "dependency unregistered");
            Ok(())
        }))
    })
}

// ============================================================================
// Scopes
// ============================================================================

/// `()` or `(parent)` → new empty scope; the parent defaults to the current scope.
fn scope_create(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::new(move |_, args| {
        arity(keys::SCOPE_CREATE, args, 0..=1)?;
        let parent = match args.first() {
            Some(value) => scope_arg(value)?,
            None => Container::upgrade(&weak)?.bound_scope(),
        };
        let scope = Scope::with_parent(parent);
        debug!(scope = %scope.id(), parent = ?scope.parent().map(|p| p.id()), "scope created");
        Ok(Value::from_arc(scope))
    })
}

/// `()` → new scope without a parent.
fn scope_create_empty() -> Behavior {
    Behavior::new(|_, args| {
        arity(keys::SCOPE_CREATE_EMPTY, args, 0..=0)?;
        let scope = Scope::empty();
        debug!(scope = %scope.id(), "empty scope created");
        Ok(Value::from_arc(scope))
    })
}

/// `()` → the calling thread's current scope.
fn scope_current(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::new(move |_, args| {
        arity(keys::SCOPE_CURRENT, args, 0..=0)?;
        Ok(Value::from_arc(Container::upgrade(&weak)?.bound_scope()))
    })
}

/// `(scope)` → action binding the executing thread to `scope`.
fn scope_current_set(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::action(move |_, args| {
        arity(keys::SCOPE_CURRENT_SET, args, 1..=1)?;
        let scope = scope_arg(&args[0])?;
        let container = Container::upgrade(&weak)?;

        Ok(Action::new(move || {
            container.bind_current(scope.clone());
            Ok(())
        }))
    })
}

/// `(scope)` → action emptying `scope`; a no-op for the root scope.
///
/// Thread bindings are left alone: a thread whose current scope was cleared
/// keeps resolving through it into its parents.
fn scope_current_clear(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::action(move |_, args| {
        arity(keys::SCOPE_CURRENT_CLEAR, args, 1..=1)?;
        let scope = scope_arg(&args[0])?;
        let container = Container::upgrade(&weak)?;

        Ok(Action::new(move || {
            if container.is_root(&scope) {
                debug!(scope = %scope.id(), "root scope is never cleared");
                return Ok(());
            }
            let removed = scope.len();
            scope.clear();
            debug!(scope = %scope.id(), removed, "scope cleared");
            Ok(())
        }))
    })
}

/// `()` or `(scope)` → the parent of `scope` (default: current scope).
fn scope_parent(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::new(move |_, args| {
        arity(keys::SCOPE_PARENT, args, 0..=1)?;
        let scope = match args.first() {
            Some(value) => scope_arg(value)?,
            None => Container::upgrade(&weak)?.bound_scope(),
        };
        scope
            .parent()
            .cloned()
            .map(Value::from_arc)
            .ok_or(IocError::NoParent { scope: scope.id() })
    })
}

// ============================================================================
// Adapters
// ============================================================================

/// `(contract, backing)` → a ready adapter instance.
fn adapter(weak: Weak<ContainerInner>) -> Behavior {
    Behavior::new(move |_, args| {
        arity(keys::ADAPTER, args, 2..=2)?;
        let contract = args[0].downcast::<Contract>().map_err(|_| {
            IocError::invalid_arguments(keys::ADAPTER, "first argument must be a Contract")
        })?;
        let container = Container::upgrade(&weak)?;
        synthesizer::synthesize(&container, &contract, args[1].clone())
    })
}
