//! Consumer side: the long-running loop that drains the queue, and the
//! pluggable execution seam it drives.

pub mod consumer;
pub mod handler;

pub use consumer::{Worker, WorkerConfig};
pub use handler::{SimulatedHandler, TaskHandler};
