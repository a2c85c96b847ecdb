use std::io;
use std::thread::{self, JoinHandle};

mod pool;
mod result;
mod worker;
pub use pool::{PoolOptions, WorkerPool};
pub use result::PoolResult;
pub use worker::WorkerHandle;

/// Starts the OS thread behind a worker.
///
/// `WorkerPool` never calls `std::thread` directly, so callers can put
/// their own thread setup (or failure injection) in front of it.
pub trait Spawn {
    fn spawn(&self, name: String, job: Job) -> io::Result<JoinHandle<()>>;
}

pub type Job = Box<dyn Send + FnOnce() + 'static>;

// sent by a worker to the pool when it reaches a terminal state
pub enum Message<T> {
    Done(usize, std::result::Result<T, String>),
    Dead(usize),
}

/// Spawns workers with `std::thread::Builder`.
#[derive(Debug, Clone, Default)]
pub struct ThreadSpawner {
    stack_size: Option<usize>,
}

impl ThreadSpawner {
    pub fn new() -> Self {
        ThreadSpawner::default()
    }

    pub fn with_stack_size(stack_size: usize) -> Self {
        ThreadSpawner {
            stack_size: Some(stack_size),
        }
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, name: String, job: Job) -> io::Result<JoinHandle<()>> {
        let mut builder = thread::Builder::new().name(name);
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder.spawn(job)
    }
}
