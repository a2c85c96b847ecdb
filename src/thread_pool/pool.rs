use super::worker::{Notifier, WorkerHandle};
use super::{Message, PoolResult, Spawn, ThreadSpawner};
use crate::error::{Error, ErrorKind, Result};
use crossbeam::channel::{unbounded, Receiver};
use slog::{debug, o, warn, Discard, Logger};
use std::fmt::Display;
use std::sync::Arc;

/// Settings applied when a `WorkerPool` starts its workers.
pub struct PoolOptions {
    logger: Logger,
    name_prefix: String,
    spawner: Box<dyn Spawn>,
}

impl PoolOptions {
    pub fn new() -> Self {
        PoolOptions {
            logger: Logger::root(Discard, o!()),
            name_prefix: "worker".to_string(),
            spawner: Box::new(ThreadSpawner::new()),
        }
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// threads are named `<prefix>-<index>`
    pub fn name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn spawner<S: Spawn + 'static>(mut self, spawner: S) -> Self {
        self.spawner = Box::new(spawner);
        self
    }
}

impl Default for PoolOptions {
    fn default() -> Self {
        PoolOptions::new()
    }
}

/// A fixed set of workers, each running the same task on its own index.
///
/// # Example
///
/// ```
/// use racepool::thread_pool::WorkerPool;
///
/// let mut pool = WorkerPool::create(3, |i| Ok::<_, String>(i * 2)).unwrap();
/// let values = pool.join_all().unwrap().into_values().unwrap();
/// assert_eq!(values, vec![0, 2, 4]);
/// ```
pub struct WorkerPool<T> {
    // taken by the first join_all
    handles: Option<Vec<WorkerHandle>>,
    receiver: Receiver<Message<T>>,
    size: usize,
    logger: Logger,
}

impl<T: Send + 'static> WorkerPool<T> {
    pub fn create<F, E>(size: usize, task: F) -> Result<Self>
    where
        F: Fn(usize) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Display + 'static,
    {
        WorkerPool::create_with(PoolOptions::default(), size, task)
    }

    /// Spawns `size` workers, worker `i` running `task(i)`.
    ///
    /// If a worker can't be spawned, the ones already running are joined
    /// before the spawn error is returned.
    pub fn create_with<F, E>(options: PoolOptions, size: usize, task: F) -> Result<Self>
    where
        F: Fn(usize) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Display + 'static,
    {
        if size == 0 {
            return Err(Error::invalid_config(
                "worker count must be positive".to_string(),
            ));
        }
        let PoolOptions {
            logger,
            name_prefix,
            spawner,
        } = options;

        let (sender, receiver) = unbounded::<Message<T>>();
        let task = Arc::new(task);
        let mut handles = Vec::with_capacity(size);

        for index in 0..size {
            let task = Arc::clone(&task);
            let notifier = Notifier::new(sender.clone(), index);
            let worker_logger = logger.new(o!("worker" => index));
            let job = Box::new(move || {
                // dropped on unwind, which reports the panic
                let notifier = notifier;
                debug!(worker_logger, "worker running");
                let outcome = task(index).map_err(|err| err.to_string());
                debug!(worker_logger, "worker finished"; "ok" => outcome.is_ok());
                notifier.done(outcome);
            });

            match spawner.spawn(format!("{}-{}", name_prefix, index), job) {
                Ok(thread) => handles.push(WorkerHandle::new(index, thread)),
                Err(err) => {
                    warn!(logger, "unable to spawn worker";
                        "worker" => index,
                        "started" => handles.len(),
                        "error" => %err
                    );
                    // no partial pools
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(Error::spawn(err));
                }
            }
        }
        debug!(logger, "workers spawned"; "size" => size);

        Ok(WorkerPool {
            handles: Some(handles),
            receiver,
            size,
            logger,
        })
    }

    /// Blocks until every worker is done and returns their outcomes in
    /// worker order. Fails with `AlreadyJoined` on a second call.
    pub fn join_all(&mut self) -> Result<PoolResult<T>> {
        let handles = self
            .handles
            .take()
            .ok_or_else(|| Error::from(ErrorKind::AlreadyJoined))?;
        let mut pending: Vec<Option<WorkerHandle>> = handles.into_iter().map(Some).collect();
        let mut slots: Vec<Option<Result<T>>> = (0..self.size).map(|_| None).collect();

        // join in completion order
        for _ in 0..self.size {
            let message = match self.receiver.recv() {
                Ok(message) => message,
                Err(_) => break,
            };
            let (index, outcome) = match message {
                Message::Done(index, outcome) => (index, Some(outcome)),
                Message::Dead(index) => (index, None),
            };
            if let Some(handle) = pending.get_mut(index).and_then(Option::take) {
                slots[index] = Some(self.settle(handle, outcome));
            }
        }

        // workers that exited without reporting
        for handle in pending.into_iter().flatten() {
            let index = handle.index();
            slots[index] = Some(self.settle(handle, None));
        }

        let slots: Vec<Result<T>> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    Err(Error::worker_failure(
                        index,
                        "worker exited without a result".to_string(),
                    ))
                })
            })
            .collect();
        let result = PoolResult::new(slots);
        debug!(self.logger, "workers joined";
            "size" => self.size,
            "succeeded" => result.succeeded()
        );
        Ok(result)
    }

    fn settle(
        &self,
        handle: WorkerHandle,
        outcome: Option<std::result::Result<T, String>>,
    ) -> Result<T> {
        let index = handle.index();
        match (handle.join(), outcome) {
            (Err(reason), _) => {
                warn!(self.logger, "worker panicked"; "worker" => index, "reason" => %reason);
                Err(Error::worker_failure(index, reason))
            }
            (Ok(()), Some(Ok(value))) => Ok(value),
            (Ok(()), Some(Err(reason))) => {
                debug!(self.logger, "worker failed"; "worker" => index, "reason" => %reason);
                Err(Error::worker_failure(index, reason))
            }
            (Ok(()), None) => Err(Error::worker_failure(
                index,
                "worker exited without a result".to_string(),
            )),
        }
    }
}

impl<T> WorkerPool<T> {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_joined(&self) -> bool {
        self.handles.is_none()
    }
}

// a pool is never dropped with running workers
impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        if let Some(handles) = self.handles.take() {
            debug!(self.logger, "pool dropped before join_all, joining workers");
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}
