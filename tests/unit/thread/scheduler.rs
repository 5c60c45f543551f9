use super::*;
use crate::foundation::rand::Rng64;
use crate::log::Logger;
use crate::scene::lifecycle::LifecycleHandle;
use crate::thread::deferred::{Deferred, IntoDeferred};
use crate::thread::routine::{Yielded, from_fn};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct RecordingLogger {
    warnings: RefCell<Vec<LogPayload>>,
}

impl Logger for RecordingLogger {
    fn debug(&self, _payload: LogPayload) {}
    fn warn(&self, payload: LogPayload) {
        self.warnings.borrow_mut().push(payload);
    }
    fn error(&self, _payload: LogPayload) {}
}

struct Fixture {
    logger: Rc<RecordingLogger>,
    rng: Rng64,
    lifecycle: LifecycleHandle,
}

impl Fixture {
    fn new() -> Self {
        let logger = Rc::new(RecordingLogger::default());
        let lifecycle = LifecycleHandle::new(Rc::clone(&logger) as Rc<dyn Logger>);
        Self {
            logger,
            rng: Rng64::new(0),
            lifecycle,
        }
    }

    fn ctx(&mut self) -> StepCtx<'_> {
        StepCtx {
            logger: self.logger.as_ref(),
            rng: &mut self.rng,
            lifecycle: &self.lifecycle,
        }
    }
}

#[test]
fn tick_ends_the_micro_step_and_done_reports_the_final_value() {
    let mut fixture = Fixture::new();
    let mut step = 0;
    let mut thread = Thread::new(from_fn(move |_ctx, _input| {
        step += 1;
        match step {
            1 => Ok(StepResult::Yield(Yielded::Tick)),
            _ => Ok(StepResult::Done(Value::Int(42))),
        }
    }));

    let mut resumes = 0;
    let mut count = || resumes += 1;
    assert!(matches!(
        advance(&mut thread, &mut fixture.ctx(), &mut count),
        Ok(Advance::Tick)
    ));
    match advance(&mut thread, &mut fixture.ctx(), &mut count) {
        Ok(Advance::Finished(value)) => assert_eq!(value, Value::Int(42)),
        _ => panic!("expected completion"),
    }
    assert!(thread.is_done());
    assert_eq!(resumes, 2);

    // Advancing a completed thread keeps reporting its final value.
    let mut noop = || {};
    match advance(&mut thread, &mut fixture.ctx(), &mut noop) {
        Ok(Advance::Finished(value)) => assert_eq!(value, Value::Int(42)),
        _ => panic!("expected cached completion"),
    }
}

#[test]
fn unsettled_pending_parks_and_resumes_with_the_resolved_value() {
    let mut fixture = Fixture::new();
    let deferred = Deferred::pending();
    let yielded = deferred.clone();
    let mut step = 0;
    let mut thread = Thread::new(from_fn(move |_ctx, input| {
        step += 1;
        match step {
            1 => Ok(StepResult::Yield(Yielded::Pending(yielded.clone()))),
            _ => {
                assert_eq!(input, Some(Value::Text("asset".to_owned())));
                Ok(StepResult::Done(Value::Null))
            }
        }
    }));

    let mut noop = || {};
    assert!(matches!(
        advance(&mut thread, &mut fixture.ctx(), &mut noop),
        Ok(Advance::Parked)
    ));
    assert!(thread.is_parked());
    // Still unsettled: the routine must not be resumed.
    assert!(matches!(
        advance(&mut thread, &mut fixture.ctx(), &mut noop),
        Ok(Advance::Parked)
    ));

    deferred.resolve(Value::Text("asset".to_owned()));
    assert!(matches!(
        advance(&mut thread, &mut fixture.ctx(), &mut noop),
        Ok(Advance::Finished(_))
    ));
}

#[test]
fn lazy_yields_convert_and_settle_within_the_same_micro_step() {
    struct Loader {
        conversions: Rc<RefCell<u32>>,
    }

    impl IntoDeferred for Loader {
        fn to_deferred(&self) -> Deferred {
            *self.conversions.borrow_mut() += 1;
            Deferred::resolved(Value::Int(5))
        }
    }

    let mut fixture = Fixture::new();
    let conversions = Rc::new(RefCell::new(0));
    let handle = Rc::clone(&conversions);
    let mut step = 0;
    let mut thread = Thread::new(from_fn(move |_ctx, input| {
        step += 1;
        match step {
            1 => Ok(StepResult::Yield(Yielded::Lazy(Box::new(Loader {
                conversions: Rc::clone(&handle),
            })))),
            _ => {
                assert_eq!(input, Some(Value::Int(5)));
                Ok(StepResult::Yield(Yielded::Tick))
            }
        }
    }));

    let mut noop = || {};
    assert!(matches!(
        advance(&mut thread, &mut fixture.ctx(), &mut noop),
        Ok(Advance::Tick)
    ));
    assert_eq!(*conversions.borrow(), 1);
}

#[test]
fn opaque_yields_warn_and_pass_through_unchanged() {
    let mut fixture = Fixture::new();
    let mut step = 0;
    let mut thread = Thread::new(from_fn(move |_ctx, input| {
        step += 1;
        match step {
            1 => Ok(StepResult::Yield(Yielded::Opaque(Value::Int(7)))),
            _ => {
                assert_eq!(input, Some(Value::Int(7)));
                Ok(StepResult::Yield(Yielded::Tick))
            }
        }
    }));

    let mut noop = || {};
    assert!(matches!(
        advance(&mut thread, &mut fixture.ctx(), &mut noop),
        Ok(Advance::Tick)
    ));
    let warnings = fixture.logger.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "Invalid value yielded by the scene");
    assert_eq!(warnings[0].object, Some(serde_json::json!({"Int": 7})));
}
