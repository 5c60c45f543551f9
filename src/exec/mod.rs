//! Execution-context plumbing: pending-dependency accumulation and the scoped
//! "current scene + current playback" stack.

/// Pending-dependency accumulation (collect / consume).
pub mod deps;
/// The scoped execution-context stack and its ambient accessors.
pub mod scope;
