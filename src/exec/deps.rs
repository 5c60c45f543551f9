//! Pending-dependency accumulation for the retry-until-ready render discipline.
//!
//! A draw pass may read a value that is not yet available. Rather than blocking the
//! routine mid-expression, the read registers a [`PendingHandle`] here and returns a
//! placeholder; the driver settles everything collected after the pass and retries.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::RefCell;

use crate::thread::deferred::Deferred;

thread_local! {
    static PENDING: RefCell<Vec<PendingHandle>> = const { RefCell::new(Vec::new()) };
}

/// A lazily-resolved value discovered mid-pass, tracked until the next checkpoint.
pub struct PendingHandle {
    /// The unsettled value.
    pub deferred: Deferred,
    /// Origin label, usually the scene that owned the pass.
    pub owner: Option<String>,
    /// Capture-time stack, populated when backtraces are enabled.
    pub stack: Option<String>,
}

impl PendingHandle {
    /// Track `deferred`, capturing a stack when the host has backtraces enabled.
    pub fn new(deferred: Deferred) -> Self {
        let backtrace = Backtrace::capture();
        let stack = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self {
            deferred,
            owner: None,
            stack,
        }
    }

    /// Label the handle with the collaborator that produced it.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

/// Register a pending handle discovered during the current logical pass.
pub fn collect(handle: PendingHandle) {
    PENDING.with(|pending| pending.borrow_mut().push(handle));
}

/// Atomically return and clear all handles collected since the last consumption.
pub fn consume_pending() -> Vec<PendingHandle> {
    PENDING.with(|pending| std::mem::take(&mut *pending.borrow_mut()))
}

/// Whether any handle was collected since the last consumption.
pub fn has_pending() -> bool {
    PENDING.with(|pending| !pending.borrow().is_empty())
}
