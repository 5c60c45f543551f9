//! Cadenza is a deterministic cooperative animation scheduling core.
//!
//! Cadenza turns a tree of suspendable computations ("threads") into a seekable,
//! re-entrant animation timeline. An external player drives one [`Scene`] at a time:
//!
//! 1. **Reset**: [`Scene::reset`] spawns a fresh root thread and advances it to the
//!    first stable point.
//! 2. **Drive**: [`Scene::next`] advances the scene by exactly one micro-step,
//!    resolving lazily-promisable and awaitable yields in between frame boundaries.
//! 3. **Discover**: [`Scene::recalculate`] dry-runs the timeline frame by frame to
//!    cache the scene's frame span and transition boundary, so later seeks are exact.
//! 4. **Render**: [`Scene::render`] wraps a draw pass in a bounded retry loop that
//!    settles lazily-resolved dependencies discovered mid-pass.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded by contract**: "threads" are cooperative suspension points,
//!   never OS threads; only one resumption is in flight at any instant.
//! - **Deterministic-by-default**: a scene with seed `S` replays the exact same
//!   timeline on every run; recalculation is idempotent once cached.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod exec;
mod foundation;
mod log;
mod playback;
mod scene;
mod signal;
mod thread;

pub use exec::deps::{PendingHandle, collect, consume_pending, has_pending};
pub use exec::scope::{ScopeGuard, current_frame, current_scene_name, enter};
pub use foundation::core::{FrameIndex, Value};
pub use foundation::error::{CadenzaError, CadenzaResult};
pub use foundation::rand::Rng64;
pub use log::{LogPayload, Logger, TracingLogger};
pub use playback::timeline::{Playback, SharedPlayback, Speed, Timeline};
pub use scene::lifecycle::{LifecycleHandle, SceneState};
pub use scene::model::{CachedSceneData, SceneCounters, SceneMetadata, SceneOpts};
pub use scene::scene::{RenderStage, Scene};
pub use signal::dispatch::{EventDispatcher, Subscription, ValueDispatcher};
pub use thread::deferred::{Deferred, IntoDeferred};
pub use thread::ops::{all, sequence};
pub use thread::routine::{Routine, RoutineFactory, StepCtx, StepResult, Yielded, from_fn};
pub use thread::scheduler::{Advance, advance};
pub use thread::thread::Thread;
