use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use false_sharing::prelude::*;
use false_sharing::{WorkerConfig, DEFAULT_LIMIT};

/// Time every accumulator strategy over one range
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First integer of the range (inclusive)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start: i64,

    /// Last integer of the range (exclusive)
    #[arg(long, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
    end: i64,

    /// Number of workers, defaults to the number of cores
    #[arg(short, long)]
    workers: Option<usize>,

    /// Strategy to run: serial, shared-array (alias shared, concurrent), isolated (alias channel), padded.
    /// Repeatable, defaults to all
    #[arg(short, long = "strategy")]
    strategies: Vec<Strategy>,

    /// Number of repeats, the fastest is reported
    #[arg(short, long, default_value_t = 5)]
    repeats: usize,

    /// Hand the division remainder to the first workers instead of dropping it
    #[arg(long)]
    balanced: bool,

    /// Pin worker i to core i
    #[arg(long)]
    pin: bool,

    /// Stack size of each worker thread in bytes
    #[arg(long)]
    stack_size: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let range = SumRange::new(args.start, args.end);
    let mut worker_config = WorkerConfig::new().with_cpu_affinity(args.pin);
    if let Some(size) = args.stack_size {
        worker_config = worker_config.with_stack_size(size);
    }

    let mut config = SumConfig::new().with_worker_config(worker_config);
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if args.balanced {
        config = config.with_partition(PartitionMode::Balanced);
    }

    let strategies = if args.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        args.strategies.clone()
    };

    println!("range:     [{}, {})", range.start(), range.end());
    println!("workers:   {}", config.resolved_workers());
    println!("partition: {}", config.partition);
    println!("repeats:   {}", args.repeats.max(1));
    println!();

    let mut results = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        match measure(strategy, range, &config, args.repeats) {
            Ok((sum, best)) => {
                println!("{:<14} {:>12.3?}  sum = {}", strategy.name(), best, sum);
                results.push(sum);
            }
            Err(e) => {
                eprintln!("{} failed: {}", strategy, e);
                return ExitCode::FAILURE;
            }
        }
    }

    if results.windows(2).any(|pair| pair[0] != pair[1]) {
        eprintln!("strategies disagree: {:?}", results);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn measure(
    strategy: Strategy,
    range: SumRange,
    config: &SumConfig,
    repeats: usize,
) -> Result<(i64, Duration)> {
    let mut best = Duration::MAX;
    let mut sum = 0;

    for _ in 0..repeats.max(1) {
        let started = Instant::now();
        sum = strategy.run(range, config)?;
        best = best.min(started.elapsed());
    }

    Ok((sum, best))
}
