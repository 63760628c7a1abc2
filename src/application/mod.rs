// Application layer: fitting use cases and their presentation

pub mod report;
pub mod resistor_fitter;

pub use resistor_fitter::{
    solve_error_minimizing, solve_min_cardinality, FitAnswer, FitOutcome, FitStatus,
    ResistorFitter,
};
