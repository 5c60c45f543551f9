use super::*;
use crate::foundation::rand::Rng64;
use crate::log::{LogPayload, Logger};
use crate::scene::lifecycle::LifecycleHandle;
use crate::thread::routine::from_fn;
use std::rc::Rc;

struct SilentLogger;

impl Logger for SilentLogger {
    fn debug(&self, _payload: LogPayload) {}
    fn warn(&self, _payload: LogPayload) {}
    fn error(&self, _payload: LogPayload) {}
}

fn ticks(frames: usize) -> Box<dyn Routine> {
    let mut remaining = frames;
    from_fn(move |_ctx, _input| {
        if remaining == 0 {
            Ok(StepResult::Done(Value::Null))
        } else {
            remaining -= 1;
            Ok(StepResult::Yield(Yielded::Tick))
        }
    })
}

fn drive_to_completion(routine: Box<dyn Routine>) -> usize {
    let logger: Rc<dyn Logger> = Rc::new(SilentLogger);
    let lifecycle = LifecycleHandle::new(Rc::clone(&logger));
    let mut rng = Rng64::new(0);
    let mut ctx = StepCtx {
        logger: logger.as_ref(),
        rng: &mut rng,
        lifecycle: &lifecycle,
    };
    let mut root = Thread::new(routine);
    let mut noop = || {};
    let mut frames = 0;
    while !root.is_done() {
        frames += 1;
        assert!(frames < 1000, "combinator failed to terminate");
        if let Ok(Advance::Finished(_)) = advance(&mut root, &mut ctx, &mut noop) {
            break;
        }
    }
    frames
}

#[test]
fn all_finishes_with_its_longest_child() {
    let frames = drive_to_completion(all(vec![ticks(2), ticks(5), ticks(1)]));
    // Children advance one frame each per parent frame; the sixth advance observes
    // the longest child's completion.
    assert_eq!(frames, 6);
}

#[test]
fn all_of_nothing_completes_immediately() {
    assert_eq!(drive_to_completion(all(Vec::new())), 1);
}

#[test]
fn sequence_runs_children_back_to_back() {
    let frames = drive_to_completion(sequence(vec![ticks(2), ticks(3)]));
    // 2 + 3 frame boundaries, with completions folded into the surrounding frames.
    assert_eq!(frames, 6);
}

#[test]
fn sequence_skips_empty_children_within_one_frame() {
    let frames = drive_to_completion(sequence(vec![ticks(0), ticks(0), ticks(1)]));
    assert_eq!(frames, 2);
}
