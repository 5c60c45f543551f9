//! Publish/subscribe dispatch used by scenes to announce lifecycle changes.
//!
//! Two flavors: [`EventDispatcher`] retains no value, [`ValueDispatcher`] retains its
//! latest value and replays it to every new subscriber. Notification order is FIFO
//! (first subscribed, first called). Mutations are synchronous; a panicking
//! subscriber propagates to the caller of the mutating operation.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Registry<T> {
    next_id: u64,
    entries: SmallVec<[(u64, Callback<T>); 2]>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: SmallVec::new(),
        }
    }
}

/// Handle to a registered callback.
///
/// Calling [`Subscription::unsubscribe`] detaches the callback. Dropping the handle
/// without unsubscribing leaves the callback attached for the channel's lifetime;
/// dropping the channel first makes unsubscription a silent no-op.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detach the callback from its channel.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Event channel with no retained value.
pub struct EventDispatcher<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> EventDispatcher<T> {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
        }
    }

    /// Register `callback`; it runs on every subsequent [`fire`](Self::fire).
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        subscribe_entry(&self.registry, Rc::new(RefCell::new(callback)))
    }

    /// Notify all subscribers in subscription order.
    pub fn fire(&self, value: &T) {
        // Snapshot so subscribers may (un)subscribe while being notified.
        let snapshot: Vec<Callback<T>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            (callback.borrow_mut())(value);
        }
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

impl<T: 'static> Default for EventDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn subscribe_entry<T: 'static>(
    registry: &Rc<RefCell<Registry<T>>>,
    callback: Callback<T>,
) -> Subscription {
    let id = {
        let mut registry = registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, callback));
        id
    };
    let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(registry);
    Subscription {
        cancel: Some(Box::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry
                    .borrow_mut()
                    .entries
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })),
    }
}

/// Value cell that retains its latest value and notifies subscribers on change.
///
/// A new subscriber is replayed the current value immediately upon subscription, so
/// there is no missed "initial" state. [`set`](Self::set) notifies only when the new
/// value actually differs from the retained one.
pub struct ValueDispatcher<T> {
    value: RefCell<T>,
    events: EventDispatcher<T>,
}

impl<T: Clone + PartialEq + 'static> ValueDispatcher<T> {
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            events: EventDispatcher::new(),
        }
    }

    /// Clone of the retained value.
    pub fn current(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value`; notifies subscribers only when it differs from the current one.
    pub fn set(&self, value: T) {
        let unchanged = { *self.value.borrow() == value };
        if unchanged {
            return;
        }
        *self.value.borrow_mut() = value.clone();
        self.events.fire(&value);
    }

    /// Register `callback`, replaying the current value to it right away.
    pub fn subscribe(&self, mut callback: impl FnMut(&T) + 'static) -> Subscription {
        let current = self.current();
        callback(&current);
        self.events.subscribe(callback)
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }
}
