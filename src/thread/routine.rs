//! The suspendable-computation contract.
//!
//! A routine is one logical lane of scene execution: it runs until it yields, and
//! the scheduler resumes it with the value its yield was waiting for. The yieldable
//! kinds form a closed set, dispatched by variant rather than type sniffing.

use crate::foundation::core::Value;
use crate::foundation::error::CadenzaResult;
use crate::foundation::rand::Rng64;
use crate::log::Logger;
use crate::scene::lifecycle::LifecycleHandle;
use crate::thread::deferred::{Deferred, IntoDeferred};

/// Per-resumption context handed to routines by the scheduler.
pub struct StepCtx<'a> {
    /// Sink for scheduler and routine diagnostics.
    pub logger: &'a dyn Logger,
    /// Deterministic per-scene random source.
    pub rng: &'a mut Rng64,
    /// Lifecycle handle of the owning scene, for guarded state transitions.
    pub lifecycle: &'a LifecycleHandle,
}

/// A value produced by a suspension point.
pub enum Yielded {
    /// Frame boundary: nothing to resolve, the micro-step ends here.
    Tick,
    /// Lazily-promisable: converted once via [`IntoDeferred`], then settled.
    Lazy(Box<dyn IntoDeferred>),
    /// Native awaitable: settled directly.
    Pending(Deferred),
    /// Unrecognized value: logged and passed back through unchanged.
    Opaque(Value),
}

/// Outcome of one resumption.
pub enum StepResult {
    /// The routine suspended.
    Yield(Yielded),
    /// The routine ran to completion with a final value.
    Done(Value),
}

/// One suspendable computation.
///
/// `input` carries the resolved value of the previous yield (`None` on the first
/// resumption). Errors propagate out of the scheduler to the external player;
/// everything recoverable is reported through the logger instead.
pub trait Routine {
    /// Run until the next suspension point or completion.
    fn resume(&mut self, ctx: &mut StepCtx<'_>, input: Option<Value>) -> CadenzaResult<StepResult>;
}

/// Factory producing a fresh root routine on every scene reset.
pub type RoutineFactory = Box<dyn FnMut() -> Box<dyn Routine>>;

struct FnRoutine<F> {
    f: F,
}

impl<F> Routine for FnRoutine<F>
where
    F: FnMut(&mut StepCtx<'_>, Option<Value>) -> CadenzaResult<StepResult>,
{
    fn resume(&mut self, ctx: &mut StepCtx<'_>, input: Option<Value>) -> CadenzaResult<StepResult> {
        (self.f)(ctx, input)
    }
}

/// Build a routine from a closure; the closure's captured state is the suspension
/// state machine.
pub fn from_fn(
    f: impl FnMut(&mut StepCtx<'_>, Option<Value>) -> CadenzaResult<StepResult> + 'static,
) -> Box<dyn Routine> {
    Box::new(FnRoutine { f })
}
