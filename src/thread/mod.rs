//! The cooperative thread scheduler: suspendable routines, lazily-resolved values,
//! thread tree nodes, the micro-step driver, and tree-building combinators.

/// Lazily-resolved value handles and the lazily-promisable capability.
pub mod deferred;
/// Combinators building thread trees out of routines.
pub mod ops;
/// The suspendable-computation contract.
pub mod routine;
/// The micro-step driver and yield classification.
pub mod scheduler;
/// Thread tree nodes.
pub mod thread;
