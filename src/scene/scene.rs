//! The scene: one animation unit with its own lifecycle, cache, and root thread.

use std::rc::Rc;

use crate::exec::{deps, scope};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::CadenzaResult;
use crate::foundation::rand::Rng64;
use crate::log::{LogPayload, Logger, TracingLogger};
use crate::playback::timeline::SharedPlayback;
use crate::scene::lifecycle::{LifecycleHandle, SceneState};
use crate::scene::model::{CachedSceneData, SceneCounters, SceneMetadata, SceneOpts};
use crate::signal::dispatch::{EventDispatcher, ValueDispatcher};
use crate::thread::routine::{RoutineFactory, StepCtx};
use crate::thread::scheduler::{Advance, advance};
use crate::thread::thread::Thread;

/// Phase marker fired on the render-lifecycle channel around each draw pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStage {
    /// A draw pass is about to run.
    Before,
    /// A draw pass completed.
    After,
}

/// One animation scene.
///
/// A scene wraps a root [`Thread`] with the lifecycle state machine, drives it one
/// micro-step per [`next`](Self::next) call, discovers its frame span with
/// [`recalculate`](Self::recalculate), and wraps drawing in the bounded
/// retry-until-ready discipline of [`render`](Self::render).
pub struct Scene {
    meta: SceneMetadata,
    opts: SceneOpts,
    factory: RoutineFactory,
    playback: SharedPlayback,
    logger: Rc<dyn Logger>,

    lifecycle: LifecycleHandle,
    thread: Option<Thread>,
    generation: u64,
    rng: Rng64,
    counters: SceneCounters,
    cache: CachedSceneData,
    cached: bool,
    previous: Option<String>,
    update_hook: Option<Box<dyn FnMut()>>,

    on_cache_changed: ValueDispatcher<CachedSceneData>,
    on_reloaded: EventDispatcher<()>,
    on_recalculated: EventDispatcher<()>,
    on_thread_changed: ValueDispatcher<Option<u64>>,
    on_render_lifecycle: EventDispatcher<RenderStage>,
    on_reset: EventDispatcher<()>,
}

impl Scene {
    /// Construct a scene; `factory` produces a fresh root routine on every reset.
    pub fn new(
        meta: SceneMetadata,
        factory: RoutineFactory,
        playback: SharedPlayback,
        opts: SceneOpts,
    ) -> CadenzaResult<Self> {
        meta.validate()?;
        opts.validate()?;
        let logger: Rc<dyn Logger> = Rc::new(TracingLogger);
        Ok(Self {
            lifecycle: LifecycleHandle::new(Rc::clone(&logger)),
            thread: None,
            generation: 0,
            rng: Rng64::new(meta.seed),
            counters: SceneCounters::default(),
            cache: CachedSceneData::default(),
            cached: false,
            previous: None,
            update_hook: None,
            on_cache_changed: ValueDispatcher::new(CachedSceneData::default()),
            on_reloaded: EventDispatcher::new(),
            on_recalculated: EventDispatcher::new(),
            on_thread_changed: ValueDispatcher::new(None),
            on_render_lifecycle: EventDispatcher::new(),
            on_reset: EventDispatcher::new(),
            meta,
            opts,
            factory,
            playback,
            logger,
        })
    }

    /// Replace the logger sink (defaults to [`TracingLogger`]).
    pub fn set_logger(&mut self, logger: Rc<dyn Logger>) {
        self.lifecycle.set_logger(Rc::clone(&logger));
        self.logger = logger;
    }

    /// Install the hook invoked after every routine resumption (the rendering
    /// collaborator uses it to recompute layout).
    pub fn set_update(&mut self, hook: Box<dyn FnMut()>) {
        self.update_hook = Some(hook);
    }

    /// Scene name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Scene metadata.
    pub fn metadata(&self) -> &SceneMetadata {
        &self.meta
    }

    /// Lifecycle handle shared with routines via their step context.
    pub fn lifecycle(&self) -> &LifecycleHandle {
        &self.lifecycle
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SceneState {
        self.lifecycle.state()
    }

    /// Whether the root routine has completed.
    pub fn is_finished(&self) -> bool {
        self.state() == SceneState::Finished
    }

    /// Whether the scene agreed to hand off (or already finished).
    pub fn can_transition_out(&self) -> bool {
        matches!(
            self.state(),
            SceneState::CanTransitionOut | SceneState::Finished
        )
    }

    /// Whether the transition in has completed.
    pub fn is_after_transition_in(&self) -> bool {
        self.state() == SceneState::AfterTransitionIn
    }

    /// Request the `Initial` state (guarded).
    pub fn enter_initial(&self) {
        self.lifecycle.enter_initial();
    }

    /// Request the `AfterTransitionIn` state (guarded).
    pub fn enter_after_transition_in(&self) {
        self.lifecycle.enter_after_transition_in();
    }

    /// Request the `CanTransitionOut` state (guarded).
    pub fn enter_can_transition_out(&self) {
        self.lifecycle.enter_can_transition_out();
    }

    /// The timeline facts discovered by the last completed recalculation.
    pub fn cache(&self) -> CachedSceneData {
        self.cache
    }

    /// Whether the cache is frozen (a recalculation completed since the last
    /// reload).
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Activity counters since the last reset.
    pub fn counters(&self) -> SceneCounters {
        self.counters
    }

    /// Name of the scene passed as `previous` to the last reset, if any.
    pub fn previous_scene_name(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Cache publication channel (replays the current cache on subscribe).
    pub fn on_cache_changed(&self) -> &ValueDispatcher<CachedSceneData> {
        &self.on_cache_changed
    }

    /// Fired when the scene is explicitly reloaded.
    pub fn on_reloaded(&self) -> &EventDispatcher<()> {
        &self.on_reloaded
    }

    /// Fired when a recalculation reports (fresh or cached).
    pub fn on_recalculated(&self) -> &EventDispatcher<()> {
        &self.on_recalculated
    }

    /// Root-thread generation channel (`None` after the root finishes).
    pub fn on_thread_changed(&self) -> &ValueDispatcher<Option<u64>> {
        &self.on_thread_changed
    }

    /// Fired around every draw pass.
    pub fn on_render_lifecycle(&self) -> &EventDispatcher<RenderStage> {
        &self.on_render_lifecycle
    }

    /// Fired after every reset, before the post-reset advance.
    pub fn on_reset(&self) -> &EventDispatcher<()> {
        &self.on_reset
    }

    /// Drop the frozen cache and announce that the scene should be rediscovered.
    pub fn reload(&mut self) {
        self.cached = false;
        self.on_reloaded.fire(&());
    }

    /// Start (or restart) the scene.
    ///
    /// Captures the current playback frame into the cache's `first_frame` if it
    /// differs, clears the per-scene counters, reseeds the random source from the
    /// scene seed, spawns a fresh root thread, lands in `AfterTransitionIn`, fires
    /// the reset event, and performs one advance to reach the first stable point.
    /// The previous thread tree is discarded without cleanup.
    pub fn reset(&mut self, previous: Option<&Scene>) -> CadenzaResult<()> {
        let frame = self.playback.borrow().frame();
        if frame != self.cache.first_frame {
            self.cache.first_frame = frame;
            self.on_cache_changed.set(self.cache);
        }
        self.counters = SceneCounters::default();
        self.rng = Rng64::new(self.meta.seed);
        self.previous = previous.map(|scene| scene.name().to_owned());

        let routine = (self.factory)();
        self.thread = Some(Thread::new(routine));
        self.generation += 1;
        self.on_thread_changed.set(Some(self.generation));

        self.lifecycle.restart();
        self.on_reset.fire(&());
        self.next()
    }

    /// Advance the scene by one micro-step.
    ///
    /// No-op without an active thread. Resolves lazily-promisable and awaitable
    /// yields in order, invokes the update hook after every resumption, and drains
    /// dependency handles collected during the step. Any that remain indicate a
    /// property was accessed before its node was ready, which is logged as an
    /// error, not retried.
    pub fn next(&mut self) -> CadenzaResult<()> {
        let Some(mut thread) = self.thread.take() else {
            return Ok(());
        };
        let _scope = scope::enter(&self.meta.name, Rc::clone(&self.playback));
        self.counters.steps += 1;

        let mut hook = self.update_hook.take();
        let outcome = {
            let mut after_resume = || {
                if let Some(hook) = hook.as_mut() {
                    hook();
                }
            };
            let mut ctx = StepCtx {
                logger: self.logger.as_ref(),
                rng: &mut self.rng,
                lifecycle: &self.lifecycle,
            };
            advance(&mut thread, &mut ctx, &mut after_resume)
        };
        self.update_hook = hook;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                self.thread = Some(thread);
                self.drain_step_dependencies();
                return Err(err);
            }
        };

        match outcome {
            Advance::Finished(_) => {
                self.lifecycle.finish();
                self.on_thread_changed.set(None);
            }
            Advance::Tick | Advance::Parked => {
                self.thread = Some(thread);
            }
        }

        self.drain_step_dependencies();
        Ok(())
    }

    /// Discover the scene's frame span without truly rendering.
    ///
    /// Idempotent once cached: reports the previously computed last frame through
    /// `set_frame` and republishes the unchanged cache. Otherwise dry-runs the
    /// timeline frame by frame until the scene can transition out, fixing the
    /// transition boundary along the way. `set_frame` must drive the playback
    /// position; the frames it receives increase strictly by 1.
    #[tracing::instrument(skip_all, fields(scene = %self.meta.name))]
    pub fn recalculate(&mut self, set_frame: &mut dyn FnMut(FrameIndex)) -> CadenzaResult<()> {
        if self.cached {
            set_frame(self.cache.last_frame);
            self.on_cache_changed.set(self.cache);
            self.on_recalculated.fire(&());
            return Ok(());
        }

        self.cache.first_frame = self.playback.borrow().frame();
        self.cache.transition_duration = -1;
        self.reset(None)?;

        while !self.can_transition_out() {
            if self.cache.transition_duration < 0 && self.is_after_transition_in() {
                let elapsed = self.playback.borrow().frame().since(self.cache.first_frame);
                self.cache.transition_duration = elapsed as i64;
            }
            let current = self.playback.borrow().frame();
            set_frame(current.advanced(1));
            self.next()?;
        }

        // A scene may finish without ever leaving `Initial`.
        if self.cache.transition_duration < 0 {
            self.cache.transition_duration = 0;
        }

        // A long frame scan should not monopolize the host.
        std::thread::yield_now();

        let last = self.playback.borrow().frame();
        self.cache.last_frame = last;
        self.cache.duration = last.since(self.cache.first_frame);
        self.cached = true;
        self.on_cache_changed.set(self.cache);
        self.on_recalculated.fire(&());
        Ok(())
    }

    /// Run one logical draw with the retry-until-ready discipline.
    ///
    /// The draw callback must be idempotent: it reruns until no unready dependency
    /// was collected during the pass, bounded by
    /// [`SceneOpts::max_render_iterations`]. Exhausting the ceiling is tolerated;
    /// the frame renders with whatever state settled.
    pub fn render(&mut self, draw: &mut dyn FnMut() -> CadenzaResult<()>) -> CadenzaResult<()> {
        let _scope = scope::enter(&self.meta.name, Rc::clone(&self.playback));
        let ceiling = self.opts.max_render_iterations;
        let mut iterations = 0usize;
        loop {
            iterations += 1;
            self.on_render_lifecycle.fire(&RenderStage::Before);
            if let Err(err) = draw() {
                deps::consume_pending();
                return Err(err);
            }
            self.on_render_lifecycle.fire(&RenderStage::After);

            let pending = deps::consume_pending();
            if pending.is_empty() || iterations >= ceiling {
                break;
            }
            for handle in &pending {
                handle.deferred.try_settle();
            }
        }
        if iterations > 1 {
            self.logger
                .debug(LogPayload::message(format!("render iterations: {iterations}")));
        }
        self.counters.renders += 1;
        Ok(())
    }

    fn drain_step_dependencies(&self) {
        for handle in deps::consume_pending() {
            let mut payload =
                LogPayload::message("Accessed a property before the node was ready");
            if let Some(owner) = handle.owner {
                payload = payload.with_object(serde_json::Value::String(owner));
            }
            if let Some(stack) = handle.stack {
                payload = payload.with_stack(stack);
            }
            self.logger.error(payload);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scene.rs"]
mod tests;
