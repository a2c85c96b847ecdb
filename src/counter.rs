use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// How `SharedCounter::increment` updates the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// read, then write back; concurrent increments can be lost
    Unsynchronized,
    /// read-modify-write under a mutex
    Locked,
}

impl Strategy {
    pub fn from_synchronized(synchronized: bool) -> Self {
        if synchronized {
            Strategy::Locked
        } else {
            Strategy::Unsynchronized
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Unsynchronized => write!(f, "unsynchronized"),
            Strategy::Locked => write!(f, "locked"),
        }
    }
}

enum Cell {
    Unsynchronized(AtomicU64),
    Locked(Mutex<u64>),
}

/// A single integer shared by every worker of a run.
///
/// The strategy is fixed when the counter is built, so one run never mixes
/// locked and unlocked updates.
///
/// ```
/// use racepool::counter::SharedCounter;
///
/// let counter = SharedCounter::locked();
/// counter.add_many(3);
/// assert_eq!(counter.value(), 3);
/// ```
pub struct SharedCounter {
    cell: Cell,
}

impl SharedCounter {
    pub fn new(strategy: Strategy) -> Self {
        let cell = match strategy {
            Strategy::Unsynchronized => Cell::Unsynchronized(AtomicU64::new(0)),
            Strategy::Locked => Cell::Locked(Mutex::new(0)),
        };
        SharedCounter { cell }
    }

    pub fn unsynchronized() -> Self {
        SharedCounter::new(Strategy::Unsynchronized)
    }

    pub fn locked() -> Self {
        SharedCounter::new(Strategy::Locked)
    }

    pub fn strategy(&self) -> Strategy {
        match self.cell {
            Cell::Unsynchronized(_) => Strategy::Unsynchronized,
            Cell::Locked(_) => Strategy::Locked,
        }
    }

    pub fn increment(&self) {
        match &self.cell {
            Cell::Unsynchronized(value) => {
                // two separate steps, another worker may store in between
                let current = value.load(Ordering::Relaxed);
                value.store(current.wrapping_add(1), Ordering::Relaxed);
            }
            Cell::Locked(value) => {
                let mut guard = lock(value);
                *guard = guard.wrapping_add(1);
            }
        }
    }

    /// Calls `increment` `n` times, returning `n`.
    pub fn add_many(&self, n: u64) -> u64 {
        for _ in 0..n {
            self.increment();
        }
        n
    }

    pub fn value(&self) -> u64 {
        match &self.cell {
            Cell::Unsynchronized(value) => value.load(Ordering::SeqCst),
            Cell::Locked(value) => *lock(value),
        }
    }
}

impl fmt::Debug for SharedCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCounter")
            .field("strategy", &self.strategy())
            .field("value", &self.value())
            .finish()
    }
}

// a panicking worker can't leave the integer half-written
fn lock(value: &Mutex<u64>) -> std::sync::MutexGuard<'_, u64> {
    value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
