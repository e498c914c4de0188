//! Command implementations, written as `impl Repository` blocks that compose
//! the repository areas.

pub mod reconcile;
