//! The scene lifecycle state machine and its seek/recalculation/caching protocol.

/// Lifecycle states and guarded transitions.
pub mod lifecycle;
/// Scene metadata, options, and the recalculation cache.
pub mod model;
/// The scene driver itself.
pub mod scene;
