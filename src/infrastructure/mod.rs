// Infrastructure layer: execution concerns around the fitting service

pub mod batch;

pub use batch::{run_batch, FitJob, JobReport};
