//! A fixed worker pool with join-collected results, and the shared-counter
//! race it was built to demonstrate.
pub mod config;
pub mod counter;
pub mod error;
pub mod race;
pub mod thread_pool;

pub use config::RaceConfig;
pub use counter::{SharedCounter, Strategy};
pub use error::{Error, ErrorKind, Result};
pub use thread_pool::{PoolResult, WorkerPool};
