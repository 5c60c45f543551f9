//! The micro-step driver.
//!
//! One call to [`advance`] resumes a thread until it reaches a frame boundary,
//! parks on an unsettled value, or completes. Every yielded value is classified
//! into exactly one of the closed [`Yielded`] kinds and resolved, in order, before
//! the routine is resumed again.

use crate::foundation::core::Value;
use crate::foundation::error::CadenzaResult;
use crate::log::LogPayload;
use crate::thread::routine::{StepCtx, StepResult, Yielded};
use crate::thread::thread::Thread;

/// Result of advancing a thread by one micro-step.
pub enum Advance {
    /// The routine reached a frame boundary.
    Tick,
    /// The routine is parked on a deferred that has not settled yet; the next call
    /// re-checks it before resuming.
    Parked,
    /// The routine ran to completion with its final value.
    Finished(Value),
}

/// Advance `thread` by one micro-step, invoking `after_resume` after every
/// resumption.
///
/// Ordering rule: resumption *n + 1* never begins before resumption *n*'s value has
/// settled; an unsettled value parks the thread instead of spinning.
pub fn advance(
    thread: &mut Thread,
    ctx: &mut StepCtx<'_>,
    after_resume: &mut dyn FnMut(),
) -> CadenzaResult<Advance> {
    if thread.is_done() {
        return Ok(Advance::Finished(thread.final_value()));
    }

    let mut input: Option<Value> = match thread.take_waiting() {
        Some(deferred) => match deferred.try_settle() {
            Some(value) => Some(value),
            None => {
                thread.park(deferred);
                return Ok(Advance::Parked);
            }
        },
        None => None,
    };

    loop {
        let step = thread.resume(ctx, input.take())?;
        after_resume();
        match step {
            StepResult::Done(value) => return Ok(Advance::Finished(value)),
            StepResult::Yield(Yielded::Tick) => return Ok(Advance::Tick),
            StepResult::Yield(Yielded::Lazy(lazy)) => {
                let deferred = lazy.to_deferred();
                match deferred.try_settle() {
                    Some(value) => input = Some(value),
                    None => {
                        thread.park(deferred);
                        return Ok(Advance::Parked);
                    }
                }
            }
            StepResult::Yield(Yielded::Pending(deferred)) => match deferred.try_settle() {
                Some(value) => input = Some(value),
                None => {
                    thread.park(deferred);
                    return Ok(Advance::Parked);
                }
            },
            StepResult::Yield(Yielded::Opaque(value)) => {
                ctx.logger.warn(
                    LogPayload::message("Invalid value yielded by the scene").with_object(
                        serde_json::to_value(&value).unwrap_or(serde_json::Value::Null),
                    ),
                );
                input = Some(value);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/thread/scheduler.rs"]
mod tests;
