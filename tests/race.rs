use racepool::config::RaceConfig;
use racepool::counter::{SharedCounter, Strategy};
use racepool::race;
use racepool::thread_pool::WorkerPool;
use slog::{o, Discard, Logger};
use std::sync::Arc;

fn logger() -> Logger {
    Logger::root(Discard, o!())
}

fn hammer(counter: Arc<SharedCounter>, workers: usize, increments: u64) -> u64 {
    let worker_counter = Arc::clone(&counter);
    let mut pool = WorkerPool::create(workers, move |_| {
        Ok::<_, String>(worker_counter.add_many(increments))
    })
    .unwrap();
    let performed: u64 = pool.join_all().unwrap().into_values().unwrap().iter().sum();
    assert_eq!(performed, workers as u64 * increments);
    counter.value()
}

#[test]
fn locked_counter_is_exact() {
    for &(workers, increments) in &[(1, 1), (2, 5_000), (10, 100), (16, 20_000)] {
        for _ in 0..3 {
            let value = hammer(Arc::new(SharedCounter::locked()), workers, increments);
            assert_eq!(value, workers as u64 * increments);
        }
    }
}

#[test]
fn unsynchronized_counter_never_exceeds_expected() {
    for _ in 0..5 {
        let value = hammer(Arc::new(SharedCounter::unsynchronized()), 4, 100);
        assert!(value <= 400);
        assert!(value >= 1);
    }
}

#[test]
fn unsynchronized_counter_loses_updates() {
    let config = RaceConfig::new(10, 1_000_000, false);
    let expected = config.expected().unwrap();
    let reports = race::run_repeated(&config, 3, &logger()).unwrap();

    for report in &reports {
        assert_eq!(report.strategy, Strategy::Unsynchronized);
        assert_eq!(report.expected, expected);
        assert_eq!(report.performed, expected);
        assert!(report.final_value <= expected);
    }
    // lost updates are likely at this contention, not guaranteed on a
    // single-core machine
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if cores > 1 {
        assert!(reports.iter().any(|report| !report.matches()));
    }
}

#[test]
fn synchronized_run_matches() {
    let config = RaceConfig::new(10, 100_000, true);
    for report in race::run_repeated(&config, 3, &logger()).unwrap() {
        assert_eq!(report.strategy, Strategy::Locked);
        assert_eq!(report.final_value, 1_000_000);
        assert!(report.matches());
        assert_eq!(report.lost_updates(), 0);
    }
}

#[test]
fn report_display() {
    let report = race::run(&RaceConfig::new(2, 10, true), &logger()).unwrap();
    let line = report.to_string();
    assert!(line.starts_with("locked: final 20 expected 20 (match, 0 lost)"));
}
