//! Scene lifecycle states and their guarded transitions.
//!
//! Invalid transitions are recoverable: they log a warning and leave the state
//! untouched. Only routine completion may force `Finished`, from any state.

use std::cell::RefCell;
use std::rc::Rc;

use crate::log::{LogPayload, Logger};

/// Lifecycle position of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SceneState {
    /// Transitioning in; the previous scene may still be visible.
    Initial,
    /// The transition in has completed; steady playback.
    AfterTransitionIn,
    /// The scene agreed to hand off to its successor.
    CanTransitionOut,
    /// The root routine has completed.
    Finished,
}

struct LifecycleInner {
    state: SceneState,
    logger: Rc<dyn Logger>,
}

/// Shared handle to a scene's lifecycle state.
///
/// The scene holds one and routines reach it through their step context, so scene
/// code arbitrarily deep in the thread tree can request transitions without a
/// reference to the scene itself.
#[derive(Clone)]
pub struct LifecycleHandle {
    inner: Rc<RefCell<LifecycleInner>>,
}

impl LifecycleHandle {
    /// Fresh handle in [`SceneState::Initial`].
    pub fn new(logger: Rc<dyn Logger>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LifecycleInner {
                state: SceneState::Initial,
                logger,
            })),
        }
    }

    /// Current state.
    pub fn state(&self) -> SceneState {
        self.inner.borrow().state
    }

    /// Request `Initial`; valid only from `AfterTransitionIn`.
    pub fn enter_initial(&self) {
        self.guarded(SceneState::Initial, &[SceneState::AfterTransitionIn]);
    }

    /// Request `AfterTransitionIn`; valid only from `Initial`.
    pub fn enter_after_transition_in(&self) {
        self.guarded(SceneState::AfterTransitionIn, &[SceneState::Initial]);
    }

    /// Request `CanTransitionOut`; valid from `AfterTransitionIn` or `Initial`.
    pub fn enter_can_transition_out(&self) {
        self.guarded(
            SceneState::CanTransitionOut,
            &[SceneState::AfterTransitionIn, SceneState::Initial],
        );
    }

    pub(crate) fn set_logger(&self, logger: Rc<dyn Logger>) {
        self.inner.borrow_mut().logger = logger;
    }

    /// Unguarded: a reset lands directly in `AfterTransitionIn`.
    pub(crate) fn restart(&self) {
        self.inner.borrow_mut().state = SceneState::AfterTransitionIn;
    }

    /// Unguarded: routine completion forces `Finished` from any state.
    pub(crate) fn finish(&self) {
        self.inner.borrow_mut().state = SceneState::Finished;
    }

    fn guarded(&self, target: SceneState, allowed_from: &[SceneState]) {
        let (current, logger) = {
            let inner = self.inner.borrow();
            (inner.state, Rc::clone(&inner.logger))
        };
        if allowed_from.contains(&current) {
            self.inner.borrow_mut().state = target;
        } else {
            // Borrow released above; a logging subscriber may read the state.
            logger.warn(LogPayload::message(format!(
                "Invalid state transition to {target:?} from {current:?}"
            )));
        }
    }
}
