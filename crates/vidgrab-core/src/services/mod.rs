//! Application services built on top of the ports.

pub mod batch;

pub use batch::{BatchCoordinator, BatchError, BatchPolicy, ValidatedBatch};
