// Infrastructure: run independent fits concurrently
// Each job solves its own model on a blocking worker; results come back in job order

use std::sync::Arc;

use crate::application::{FitAnswer, ResistorFitter};
use crate::domain::{
    catalog::Catalog,
    fit_error::{FitError, FitResult},
    solver_service::SolverError,
    value_objects::Topology,
};

/// One fit request
#[derive(Debug, Clone)]
pub struct FitJob {
    pub catalog: Arc<Catalog>,
    pub target: f64,
    pub topology: Topology,
    /// `Some` selects the fewest-parts search, `None` the closest-value search
    pub tolerance: Option<f64>,
}

impl FitJob {
    pub fn new(catalog: Arc<Catalog>, target: f64, topology: Topology) -> Self {
        Self {
            catalog,
            target,
            topology,
            tolerance: None,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Run the job synchronously on `fitter`
    pub fn run(&self, fitter: &ResistorFitter) -> FitResult<FitAnswer> {
        match self.tolerance {
            None => fitter
                .solve_error_minimizing(&self.catalog, self.target, self.topology)
                .map(FitAnswer::Found),
            Some(tolerance) => {
                fitter.solve_min_cardinality(&self.catalog, self.target, self.topology, tolerance)
            }
        }
    }
}

/// A job and what came of it
#[derive(Debug)]
pub struct JobReport {
    pub job: FitJob,
    pub answer: FitResult<FitAnswer>,
}

/// Solve every job concurrently and return the reports in the order the jobs were given.
pub async fn run_batch(fitter: Arc<ResistorFitter>, jobs: Vec<FitJob>) -> Vec<JobReport> {
    log::debug!("running {} fit job(s) on {}", jobs.len(), fitter.solver_name());

    let handles = jobs.into_iter().map(|job| {
        let fitter = Arc::clone(&fitter);
        let spawned = job.clone();
        let handle = tokio::task::spawn_blocking(move || spawned.run(&fitter));
        async move {
            let answer = match handle.await {
                Ok(answer) => answer,
                Err(e) => Err(FitError::Solver(SolverError::ExecutionFailed(format!(
                    "fit worker stopped: {}",
                    e
                )))),
            };
            JobReport { job, answer }
        }
    });

    futures::future::join_all(handles).await
}
