//! Per-thread current-scope bindings.
//!
//! Each thread keeps one binding per container, tagged with the container's
//! generation at the time it was made. A missing binding, or one made before
//! the container's last reset, reads as "use the root scope".

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use ioc_kernel::Scope;
use uuid::Uuid;

use crate::container::ContainerInner;

struct Binding {
    owner: Weak<ContainerInner>,
    generation: u64,
    scope: Arc<Scope>,
}

impl Binding {
    fn is_live(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

thread_local! {
    static BINDINGS: RefCell<HashMap<Uuid, Binding>> = RefCell::new(HashMap::new());
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Remove bindings whose container is gone. The caller drops the result
/// after releasing the borrow.
fn take_dead(bindings: &mut HashMap<Uuid, Binding>) -> Vec<Binding> {
    let dead: Vec<Uuid> = bindings
        .iter()
        .filter(|(_, binding)| !binding.is_live())
        .map(|(id, _)| *id)
        .collect();
    dead.iter().filter_map(|id| bindings.remove(id)).collect()
}

/// The scope this thread bound for `container`, if the binding is current.
///
/// A binding from an earlier generation is discarded on sight.
pub(crate) fn current(container: Uuid, generation: u64) -> Option<Arc<Scope>> {
    let (scope, stale) = BINDINGS.with(|bindings| {
        let mut bindings = bindings.borrow_mut();
        let fresh = bindings.get(&container).map(|binding| binding.generation == generation);
        match fresh {
            Some(true) => (bindings.get(&container).map(|b| b.scope.clone()), None),
            Some(false) => (None, bindings.remove(&container)),
            None => (None, None),
        }
    });
    drop(stale);
    scope
}

pub(crate) fn bind(owner: Weak<ContainerInner>, container: Uuid, generation: u64, scope: Arc<Scope>) {
    // Displaced and dead scopes are dropped outside the borrow: their
    // behaviors may own containers whose drop re-enters BINDINGS.
    let (previous, dead) = BINDINGS.with(|bindings| {
        let mut bindings = bindings.borrow_mut();
        let dead = take_dead(&mut bindings);
        let previous = bindings.insert(
            container,
            Binding {
                owner,
                generation,
                scope,
            },
        );
        (previous, dead)
    });
    drop(previous);
    drop(dead);
}

/// Forget this thread's binding for `container`.
///
/// Safe to call from destructors: a no-op while the thread-local is being
/// torn down or already borrowed.
pub(crate) fn unbind(container: Uuid) {
    let previous = BINDINGS
        .try_with(|bindings| {
            bindings
                .try_borrow_mut()
                .ok()
                .and_then(|mut bindings| bindings.remove(&container))
        })
        .ok()
        .flatten();
    drop(previous);
}

/// Tracks nested resolutions on this thread; the counter drops with the guard.
pub(crate) struct DepthGuard {
    _private: (),
}

impl DepthGuard {
    /// Enter one level. Returns `None` when `limit` would be exceeded (`0` = unlimited).
    pub(crate) fn enter(limit: usize) -> Option<Self> {
        DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if limit != 0 && next > limit {
                return None;
            }
            depth.set(next);
            Some(Self { _private: () })
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
pub(crate) fn depth() -> usize {
    DEPTH.with(Cell::get)
}
