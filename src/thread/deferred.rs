//! Lazily-resolved values.
//!
//! A [`Deferred`] stands in for a value that settles outside the current resumption:
//! an asset still loading, a layout not yet solved. Settling is synchronous and
//! deterministic; "awaiting" a deferred means forcing its thunk or re-checking it on
//! a later tick, never blocking the host.

use std::cell::RefCell;
use std::rc::Rc;

use crate::exec::{deps, scope};
use crate::foundation::core::Value;

enum DeferredState {
    /// Not resolved; some external collaborator will call [`Deferred::resolve`].
    Pending,
    /// Not resolved; forcing the thunk may produce the value.
    Lazy(Box<dyn FnMut() -> Option<Value>>),
    /// Settled.
    Resolved(Value),
}

/// Shared handle to a lazily-resolved value.
///
/// Clones share the same slot; the first resolution wins and later ones are ignored.
#[derive(Clone)]
pub struct Deferred {
    inner: Rc<RefCell<DeferredState>>,
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match &*self.inner.borrow() {
            DeferredState::Pending => "pending",
            DeferredState::Lazy(_) => "lazy",
            DeferredState::Resolved(_) => "resolved",
        };
        f.debug_tuple("Deferred").field(&tag).finish()
    }
}

impl Deferred {
    /// A deferred awaiting an external [`resolve`](Self::resolve) call.
    pub fn pending() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DeferredState::Pending)),
        }
    }

    /// A deferred that is already settled.
    pub fn resolved(value: Value) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DeferredState::Resolved(value))),
        }
    }

    /// A deferred that settles by forcing `thunk`; the thunk may report "not yet"
    /// by returning `None` and will be forced again at the next checkpoint.
    pub fn lazy(thunk: impl FnMut() -> Option<Value> + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DeferredState::Lazy(Box::new(thunk)))),
        }
    }

    /// Settle the deferred with `value`. The first resolution wins.
    pub fn resolve(&self, value: Value) {
        let mut state = self.inner.borrow_mut();
        if !matches!(*state, DeferredState::Resolved(_)) {
            *state = DeferredState::Resolved(value);
        }
    }

    /// Whether the deferred has settled.
    pub fn is_resolved(&self) -> bool {
        matches!(*self.inner.borrow(), DeferredState::Resolved(_))
    }

    /// Clone of the settled value, without forcing a lazy thunk.
    pub fn peek(&self) -> Option<Value> {
        match &*self.inner.borrow() {
            DeferredState::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Attempt to settle: returns the value, forcing the lazy thunk if present.
    pub fn try_settle(&self) -> Option<Value> {
        let mut state = self.inner.borrow_mut();
        match &mut *state {
            DeferredState::Resolved(value) => Some(value.clone()),
            DeferredState::Pending => None,
            DeferredState::Lazy(thunk) => match thunk() {
                Some(value) => {
                    *state = DeferredState::Resolved(value.clone());
                    Some(value)
                }
                None => None,
            },
        }
    }

    /// Reactive read: the settled value, or `None` after registering a pending
    /// handle with the dependency context, labeled with the scene currently on the
    /// execution-context stack.
    pub fn request(&self) -> Option<Value> {
        if let Some(value) = self.peek() {
            return Some(value);
        }
        let mut handle = deps::PendingHandle::new(self.clone());
        if let Some(owner) = scope::current_scene_name() {
            handle = handle.with_owner(owner);
        }
        deps::collect(handle);
        None
    }
}

/// Capability of lazily-promisable yields: an explicit, one-shot conversion to a
/// settleable handle.
pub trait IntoDeferred {
    /// Convert to the deferred the scheduler should settle before resuming.
    fn to_deferred(&self) -> Deferred;
}

impl IntoDeferred for Deferred {
    fn to_deferred(&self) -> Deferred {
        self.clone()
    }
}
