//! Graceful shutdown of stage processes.

mod child;

pub use child::shutdown_child;
