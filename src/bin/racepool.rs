use clap::{crate_authors, crate_version, Clap};
use racepool::{config::RaceConfig, error::Result, race};
use slog::*;
use std::{path::PathBuf, process::exit};

#[derive(Clap)]
#[clap(version = crate_version!(), author = crate_authors!())]
struct Options {
    /// number of workers sharing the counter
    #[clap(long, short)]
    workers: Option<usize>,

    /// increments performed by each worker
    #[clap(long, short)]
    increments: Option<u64>,

    /// guard the counter with a mutex
    #[clap(long, short)]
    synchronized: bool,

    #[clap(long, short, default_value = "1")]
    runs: usize,

    /// JSON file with worker_count, increments_per_worker and synchronized
    #[clap(long, short, parse(from_os_str))]
    config: Option<PathBuf>,

    /// log every worker
    #[clap(long, short)]
    verbose: bool,
}

fn main() {
    let options = Options::parse();
    let logger = logger(options.verbose);

    if let Err(e) = run(&options, &logger) {
        error!(&logger, "{}", e);
        // flush the async drain before exiting
        drop(logger);
        exit(1);
    }
}

fn logger(verbose: bool) -> slog::Logger {
    let level = if verbose { Level::Debug } else { Level::Info };
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = LevelFilter::new(drain, level).fuse();

    slog::Logger::root(drain, o!())
}

fn run(options: &Options, logger: &Logger) -> Result<()> {
    let config = load_config(options)?;
    info!(logger, "racepool initializing";
        "version" => crate_version!(),
        "workers" => config.worker_count,
        "increments" => config.increments_per_worker,
        "synchronized" => config.synchronized,
        "runs" => options.runs
    );

    let reports = race::run_repeated(&config, options.runs, logger)?;
    for report in &reports {
        println!(
            "final: {}, expected: {}, {}",
            report.final_value,
            report.expected,
            if report.matches() { "match" } else { "mismatch" }
        );
    }
    Ok(())
}

// command line flags override the config file
fn load_config(options: &Options) -> Result<RaceConfig> {
    let mut config = match &options.config {
        Some(path) => RaceConfig::from_path(path)?,
        None => RaceConfig::default(),
    };
    if let Some(workers) = options.workers {
        config.worker_count = workers;
    }
    if let Some(increments) = options.increments {
        config.increments_per_worker = increments;
    }
    if options.synchronized {
        config.synchronized = true;
    }
    config.validate()?;
    Ok(config)
}
