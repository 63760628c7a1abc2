//! resistor-fit: choose resistors from a parts bin to approximate target resistances.
//!
//! ```bash
//! resistor-fit --values 1,2,3,4,5,6,7 --parallel 1.5555 1.9
//! resistor-fit --range 1 100 --tolerance 0.1 1056
//! ```

use std::sync::Arc;

use clap::Parser;
use resistor_fit::{
    run_batch, Catalog, FitJob, ResistorFitter, SolverBackend, SolverConfig, Topology,
};

/// Resistor network fitter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target resistances to approximate
    #[arg(value_name = "TARGET", required = true)]
    targets: Vec<f64>,

    /// Comma separated resistor values in the bin (repeat a value to stock it twice)
    #[arg(long, value_delimiter = ',', conflicts_with = "range")]
    values: Vec<f64>,

    /// Stock one resistor of every integer value from START up to, not including, END
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    range: Option<Vec<u32>>,

    /// Wire the chosen resistors in parallel instead of series
    #[arg(short, long)]
    parallel: bool,

    /// Use as few resistors as possible within this relative tolerance (e.g. 0.1)
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Solver backend: auto, highs or cbc
    #[arg(long, default_value = "auto")]
    backend: SolverBackend,

    /// Wall-clock budget per target in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Log every fit and show the engine's own output (RUST_LOG overrides the log level)
    #[arg(short, long)]
    verbose: bool,
}

/// Default log filter: fit outcomes and model traces with `--verbose`, budget warnings otherwise
fn log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level(args.verbose)),
    )
    .init();

    let catalog = match args.range.as_deref() {
        Some(&[start, end]) => Catalog::range(start, end)?,
        _ => Catalog::new(args.values)?,
    };
    let catalog = Arc::new(catalog);

    let topology = if args.parallel {
        Topology::Parallel
    } else {
        Topology::Series
    };

    let mut config = SolverConfig::default()
        .with_backend(args.backend)
        .with_verbose(args.verbose);
    if let Some(limit) = args.time_limit {
        config = config.with_time_limit(limit);
    }

    let fitter = Arc::new(ResistorFitter::from_config(config)?);

    let jobs = args
        .targets
        .iter()
        .map(|&target| {
            let job = FitJob::new(Arc::clone(&catalog), target, topology);
            match args.tolerance {
                Some(tolerance) => job.with_tolerance(tolerance),
                None => job,
            }
        })
        .collect();

    let mut failed = false;
    for report in run_batch(fitter, jobs).await {
        match report.answer {
            Ok(answer) => println!("{}", answer),
            Err(e) => {
                failed = true;
                eprintln!("target {}: {}", report.job.target, e);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
