//! Combinators building thread trees out of routines.
//!
//! Children run through the same micro-step driver as the root, so they get the
//! identical yield classification; a parked child simply re-checks its deferred on
//! the parent's next frame.

use smallvec::SmallVec;

use crate::foundation::core::Value;
use crate::foundation::error::CadenzaResult;
use crate::thread::routine::{Routine, StepCtx, StepResult, Yielded};
use crate::thread::scheduler::{Advance, advance};
use crate::thread::thread::Thread;

/// Run `routines` as sibling child threads, one frame each per parent frame, until
/// all of them have finished.
pub fn all(routines: Vec<Box<dyn Routine>>) -> Box<dyn Routine> {
    Box::new(AllRoutine {
        children: routines.into_iter().map(Thread::new).collect(),
    })
}

/// Run `routines` as child threads in order, starting each as its predecessor
/// finishes; a successor can start within the same frame its predecessor ends.
pub fn sequence(routines: Vec<Box<dyn Routine>>) -> Box<dyn Routine> {
    Box::new(SequenceRoutine {
        children: routines.into_iter().map(Thread::new).collect(),
        cursor: 0,
    })
}

struct AllRoutine {
    children: SmallVec<[Thread; 2]>,
}

impl Routine for AllRoutine {
    fn resume(&mut self, ctx: &mut StepCtx<'_>, _input: Option<Value>) -> CadenzaResult<StepResult> {
        let mut noop = || {};
        let mut remaining = false;
        for child in self.children.iter_mut() {
            if child.is_done() {
                continue;
            }
            match advance(child, ctx, &mut noop)? {
                Advance::Finished(_) => {}
                Advance::Tick | Advance::Parked => remaining = true,
            }
        }
        if remaining {
            Ok(StepResult::Yield(Yielded::Tick))
        } else {
            Ok(StepResult::Done(Value::Null))
        }
    }
}

struct SequenceRoutine {
    children: SmallVec<[Thread; 2]>,
    cursor: usize,
}

impl Routine for SequenceRoutine {
    fn resume(&mut self, ctx: &mut StepCtx<'_>, _input: Option<Value>) -> CadenzaResult<StepResult> {
        let mut noop = || {};
        while let Some(child) = self.children.get_mut(self.cursor) {
            match advance(child, ctx, &mut noop)? {
                Advance::Finished(_) => self.cursor += 1,
                Advance::Tick | Advance::Parked => return Ok(StepResult::Yield(Yielded::Tick)),
            }
        }
        Ok(StepResult::Done(Value::Null))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/thread/ops.rs"]
mod tests;
