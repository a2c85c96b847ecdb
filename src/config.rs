use crate::counter::Strategy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parameters of one race demonstration.
///
/// Loaded from JSON, missing fields fall back to the defaults:
///
/// ```
/// use racepool::config::RaceConfig;
///
/// let config: RaceConfig = serde_json::from_str(r#"{"synchronized": true}"#).unwrap();
/// assert_eq!(config.worker_count, 10);
/// assert!(config.synchronized);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub worker_count: usize,
    pub increments_per_worker: u64,
    pub synchronized: bool,
}

impl RaceConfig {
    pub const DEFAULT_WORKERS: usize = 10;
    pub const DEFAULT_INCREMENTS: u64 = 1_000_000;

    pub fn new(worker_count: usize, increments_per_worker: u64, synchronized: bool) -> Self {
        RaceConfig {
            worker_count,
            increments_per_worker,
            synchronized,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn strategy(&self) -> Strategy {
        Strategy::from_synchronized(self.synchronized)
    }

    /// `worker_count * increments_per_worker`
    pub fn expected(&self) -> Result<u64> {
        (self.worker_count as u64)
            .checked_mul(self.increments_per_worker)
            .ok_or_else(|| {
                Error::invalid_config(format!(
                    "{} workers x {} increments overflows the counter",
                    self.worker_count, self.increments_per_worker
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(Error::invalid_config(
                "worker count must be positive".to_string(),
            ));
        }
        if self.increments_per_worker == 0 {
            return Err(Error::invalid_config(
                "increments per worker must be positive".to_string(),
            ));
        }
        self.expected().map(|_| ())
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig::new(
            RaceConfig::DEFAULT_WORKERS,
            RaceConfig::DEFAULT_INCREMENTS,
            false,
        )
    }
}
