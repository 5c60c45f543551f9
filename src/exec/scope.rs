//! The scoped execution-context stack.
//!
//! Reactive reads performed deep inside helper code need to know which scene and
//! playback they belong to without explicit parameter threading. Scenes push an
//! entry for the duration of every `next()`/`render()` call; the entry is popped on
//! every exit path, including unwinding.

use std::cell::RefCell;

use crate::foundation::core::FrameIndex;
use crate::playback::timeline::SharedPlayback;

thread_local! {
    static STACK: RefCell<Vec<ScopeEntry>> = const { RefCell::new(Vec::new()) };
}

/// One entry of the execution-context stack: the currently executing scene and the
/// playback surface driving it.
#[derive(Clone)]
pub struct ScopeEntry {
    /// Name of the scene that pushed this entry.
    pub scene: String,
    /// Playback surface of that scene.
    pub playback: SharedPlayback,
}

/// Guard restoring the stack to its depth at [`enter`] time when dropped.
#[must_use = "dropping the guard pops the scope immediately"]
pub struct ScopeGuard {
    depth: usize,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        STACK.with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// Push a `{scene, playback}` pair for the duration of the returned guard.
pub fn enter(scene: &str, playback: SharedPlayback) -> ScopeGuard {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(ScopeEntry {
            scene: scene.to_owned(),
            playback,
        });
        ScopeGuard {
            depth: stack.len() - 1,
        }
    })
}

/// Snapshot of the innermost entry, if any scene is currently executing.
pub fn current() -> Option<ScopeEntry> {
    STACK.with(|stack| stack.borrow().last().cloned())
}

/// Name of the currently executing scene, if any.
pub fn current_scene_name() -> Option<String> {
    current().map(|entry| entry.scene)
}

/// Frame of the playback driving the currently executing scene, if any.
pub fn current_frame() -> Option<FrameIndex> {
    current().map(|entry| entry.playback.borrow().frame())
}
