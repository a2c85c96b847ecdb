use crate::config::RaceConfig;
use crate::counter::{SharedCounter, Strategy};
use crate::error::Result;
use crate::thread_pool::{PoolOptions, WorkerPool};
use slog::{info, o, warn, Logger};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What one run of the counter demonstration observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceReport {
    pub strategy: Strategy,
    pub final_value: u64,
    pub expected: u64,
    // increments reported by the workers themselves
    pub performed: u64,
    pub elapsed: Duration,
}

impl RaceReport {
    pub fn matches(&self) -> bool {
        self.final_value == self.expected
    }

    pub fn lost_updates(&self) -> u64 {
        self.expected.saturating_sub(self.final_value)
    }
}

impl fmt::Display for RaceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: final {} expected {} ({}, {} lost) in {:?}",
            self.strategy,
            self.final_value,
            self.expected,
            if self.matches() { "match" } else { "mismatch" },
            self.lost_updates(),
            self.elapsed
        )
    }
}

/// Runs `worker_count` workers that each increment one shared counter
/// `increments_per_worker` times, then compares the final value.
///
/// ```
/// use racepool::{config::RaceConfig, race};
/// use slog::{o, Discard, Logger};
///
/// let logger = Logger::root(Discard, o!());
/// let report = race::run(&RaceConfig::new(4, 1000, true), &logger).unwrap();
/// assert!(report.matches());
/// ```
pub fn run(config: &RaceConfig, logger: &Logger) -> Result<RaceReport> {
    config.validate()?;
    let expected = config.expected()?;
    let strategy = config.strategy();
    let increments = config.increments_per_worker;

    let counter = Arc::new(SharedCounter::new(strategy));
    let worker_counter = Arc::clone(&counter);

    let start = Instant::now();
    let options = PoolOptions::new()
        .logger(logger.new(o!("strategy" => strategy.to_string())))
        .name_prefix("counter");
    let mut pool = WorkerPool::create_with(options, config.worker_count, move |_| {
        Ok::<_, String>(worker_counter.add_many(increments))
    })?;
    let result = pool.join_all()?;
    let elapsed = start.elapsed();

    for (index, err) in result.failures() {
        warn!(logger, "counter worker failed"; "worker" => index, "error" => %err);
    }
    let performed: u64 = result.iter().filter_map(|slot| slot.as_ref().ok()).sum();

    let report = RaceReport {
        strategy,
        final_value: counter.value(),
        expected,
        performed,
        elapsed,
    };
    info!(logger, "race finished";
        "strategy" => strategy.to_string(),
        "final" => report.final_value,
        "expected" => report.expected,
        "lost" => report.lost_updates(),
        "elapsed_ms" => report.elapsed.as_millis() as u64
    );
    Ok(report)
}

/// Repeats `run`, the race only shows up some of the time.
pub fn run_repeated(config: &RaceConfig, runs: usize, logger: &Logger) -> Result<Vec<RaceReport>> {
    (0..runs)
        .map(|round| run(config, &logger.new(o!("run" => round))))
        .collect()
}
