//! Thread tree nodes.

use crate::foundation::core::Value;
use crate::foundation::error::CadenzaResult;
use crate::thread::deferred::Deferred;
use crate::thread::routine::{Routine, StepCtx, StepResult};

/// An exclusively-owned, suspendable computation: one logical execution lane.
///
/// A thread is either running or suspended at a yield; it terminates when its
/// routine completes. Dropping a thread (or a whole tree of them, through
/// combinators) cancels it silently; no cleanup runs on the discarded routine.
pub struct Thread {
    routine: Box<dyn Routine>,
    waiting: Option<Deferred>,
    done: bool,
    result: Value,
}

impl Thread {
    /// Wrap `routine` in a fresh, runnable thread.
    pub fn new(routine: Box<dyn Routine>) -> Self {
        Self {
            routine,
            waiting: None,
            done: false,
            result: Value::Null,
        }
    }

    /// Whether the routine has completed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the thread is parked on an unsettled deferred.
    pub fn is_parked(&self) -> bool {
        self.waiting.is_some()
    }

    /// Final value of a completed routine (`Value::Null` until completion).
    pub fn final_value(&self) -> Value {
        self.result.clone()
    }

    pub(crate) fn park(&mut self, deferred: Deferred) {
        self.waiting = Some(deferred);
    }

    pub(crate) fn take_waiting(&mut self) -> Option<Deferred> {
        self.waiting.take()
    }

    pub(crate) fn resume(
        &mut self,
        ctx: &mut StepCtx<'_>,
        input: Option<Value>,
    ) -> CadenzaResult<StepResult> {
        let step = self.routine.resume(ctx, input)?;
        if let StepResult::Done(value) = &step {
            self.done = true;
            self.result = value.clone();
        }
        Ok(step)
    }
}
