//! Pick resistors from a parts bin so that, wired in series or in parallel, they
//! approximate a target resistance.
//!
//! Two searches are offered. [`solve_error_minimizing`] finds the subset whose combined
//! resistance is closest to the target. [`solve_min_cardinality`] finds the fewest parts
//! whose combination falls within a relative tolerance of the target. Both are posed as
//! small mixed-integer programs and handed to a MILP backend (HiGHS by default, COIN-OR CBC
//! with the `coin_cbc` feature).
//!
//! ```no_run
//! use resistor_fit::{solve_error_minimizing, Topology};
//!
//! let outcome = solve_error_minimizing(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 1.5555, Topology::Parallel)?;
//! println!("{}", outcome);
//! # Ok::<(), resistor_fit::FitError>(())
//! ```

// Domain layer: formulation, decoding and the solver contract
pub mod domain;

// Application layer: fitting use cases
pub mod application;

// Infrastructure layer: concurrent batch execution
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Catalog, FitError, FitMode, FitResult, OptimizationProblem, Realized, Selection, Solution,
    SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService, Topology,
};

pub use application::{
    solve_error_minimizing, solve_min_cardinality, FitAnswer, FitOutcome, FitStatus,
    ResistorFitter,
};

pub use infrastructure::{run_batch, FitJob, JobReport};

pub use solver::SolverFactory;

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
