// Use cases: fit a resistor network by error or by part count
// Orchestrates transform -> model -> solver -> decoder; owns no formulation logic itself

use std::sync::Arc;

use crate::domain::{
    catalog::{check_tolerance, Catalog},
    decoder::{decode, Realized, Selection},
    fit_error::{FitError, FitResult},
    formulation::{build_model, FitMode},
    models::{OptimizationProblem, Solution, SolverConfig, SolverStatistics},
    solver_service::SolverService,
    transform::WorkingDomain,
    value_objects::{SolutionStatus, Topology},
};
use crate::solver::SolverFactory;

/// How far the engine got with a returned selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    /// Proven best for the requested objective
    Optimal,
    /// Best feasible selection found before the time limit
    BudgetExhausted,
}

/// A decoded fit together with its inputs and solve statistics
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub topology: Topology,
    pub target: f64,
    pub selection: Selection,
    pub status: FitStatus,
    pub statistics: SolverStatistics,
}

impl FitOutcome {
    pub fn selected(&self) -> &[f64] {
        &self.selection.values
    }

    pub fn selected_indices(&self) -> &[usize] {
        &self.selection.indices
    }

    pub fn realized(&self) -> Realized {
        self.selection.realized
    }

    pub fn error_pct(&self) -> Option<f64> {
        self.selection.error_pct
    }

    pub fn is_optimal(&self) -> bool {
        self.status == FitStatus::Optimal
    }
}

/// Answer of a tolerance search; an infeasible band is an answer, not an error.
#[derive(Debug, Clone)]
pub enum FitAnswer {
    Found(FitOutcome),
    NoSolution,
}

impl FitAnswer {
    pub fn outcome(&self) -> Option<&FitOutcome> {
        match self {
            FitAnswer::Found(outcome) => Some(outcome),
            FitAnswer::NoSolution => None,
        }
    }

    pub fn into_outcome(self) -> Option<FitOutcome> {
        match self {
            FitAnswer::Found(outcome) => Some(outcome),
            FitAnswer::NoSolution => None,
        }
    }

    /// Selected values, empty when there is no solution
    pub fn selected(&self) -> &[f64] {
        self.outcome().map(|o| o.selected()).unwrap_or(&[])
    }
}

/// Fits resistor networks with one solver backend and one configuration.
///
/// Each call builds and solves a fresh model, so a fitter can be shared between threads.
pub struct ResistorFitter {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl ResistorFitter {
    pub fn new(solver: Arc<dyn SolverService>, config: SolverConfig) -> Self {
        Self { solver, config }
    }

    /// Fitter backed by the solver `config.backend` selects
    pub fn from_config(config: SolverConfig) -> FitResult<Self> {
        let solver = SolverFactory::create_solver(&config)?;
        Ok(Self::new(solver, config))
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Select the subset whose combination is closest to `target`, with no limit on count.
    ///
    /// Selecting nothing is always feasible, so any non-optimal engine status is a
    /// [`FitError::SolverDefect`].
    pub fn solve_error_minimizing(
        &self,
        catalog: &Catalog,
        target: f64,
        topology: Topology,
    ) -> FitResult<FitOutcome> {
        let domain = WorkingDomain::new(catalog, target, topology)?;
        let model = build_model(&domain, target, FitMode::MinimizeError, self.config.clone());
        let solution = self.run(&model.problem)?;

        match solution.status {
            SolutionStatus::Optimal => self.outcome(catalog, target, topology, solution),
            SolutionStatus::TimeLimit => self.best_known(catalog, target, topology, solution),
            status => Err(FitError::solver_defect(format!(
                "{} returned {} for '{}', which is feasible by construction: {}",
                self.solver.name(),
                status,
                model.problem.name,
                solution.message
            ))),
        }
    }

    /// Select the fewest parts whose combination lies within `tolerance` of `target`.
    ///
    /// An infeasible band yields [`FitAnswer::NoSolution`].
    pub fn solve_min_cardinality(
        &self,
        catalog: &Catalog,
        target: f64,
        topology: Topology,
        tolerance: f64,
    ) -> FitResult<FitAnswer> {
        let tolerance = check_tolerance(tolerance)?;
        let domain = WorkingDomain::new(catalog, target, topology)?;
        let model = build_model(
            &domain,
            target,
            FitMode::MinimizeCount { tolerance },
            self.config.clone(),
        );
        let solution = self.run(&model.problem)?;

        match solution.status {
            SolutionStatus::Optimal => self
                .outcome(catalog, target, topology, solution)
                .map(FitAnswer::Found),
            SolutionStatus::Infeasible => {
                log::info!(
                    "no {} combination within {}% of {}",
                    topology,
                    tolerance * 100.0,
                    target
                );
                Ok(FitAnswer::NoSolution)
            }
            SolutionStatus::TimeLimit => self
                .best_known(catalog, target, topology, solution)
                .map(FitAnswer::Found),
            status => Err(FitError::solver_defect(format!(
                "{} returned {} for bounded model '{}': {}",
                self.solver.name(),
                status,
                model.problem.name,
                solution.message
            ))),
        }
    }

    fn run(&self, problem: &OptimizationProblem) -> FitResult<Solution> {
        log::debug!(
            "solving '{}' with {} ({} variables, {} constraints)",
            problem.name,
            self.solver.name(),
            problem.num_variables(),
            problem.constraints.len()
        );
        let solution = self.solver.solve(problem)?;
        log::debug!(
            "'{}' finished as {} in {:.1} ms ({})",
            problem.name,
            solution.status,
            solution.statistics.solve_time_ms,
            solution.message
        );
        Ok(solution)
    }

    fn outcome(
        &self,
        catalog: &Catalog,
        target: f64,
        topology: Topology,
        solution: Solution,
    ) -> FitResult<FitOutcome> {
        self.decode_with_status(catalog, target, topology, solution, FitStatus::Optimal)
    }

    /// Accept a time-limited incumbent only if it is a genuine feasible point.
    fn best_known(
        &self,
        catalog: &Catalog,
        target: f64,
        topology: Topology,
        solution: Solution,
    ) -> FitResult<FitOutcome> {
        let limit_secs = self.config.time_limit.unwrap_or_default();
        if !solution.has_values()
            || !solution
                .quality
                .is_acceptable(self.config.integrality_tolerance)
        {
            log::warn!(
                "time limit of {}s hit with no usable selection for {} target {}",
                limit_secs,
                topology,
                target
            );
            return Err(FitError::BudgetExhausted { limit_secs });
        }
        log::warn!(
            "time limit of {}s hit; returning best known {} selection for {}",
            limit_secs,
            topology,
            target
        );
        self.decode_with_status(catalog, target, topology, solution, FitStatus::BudgetExhausted)
    }

    fn decode_with_status(
        &self,
        catalog: &Catalog,
        target: f64,
        topology: Topology,
        solution: Solution,
        status: FitStatus,
    ) -> FitResult<FitOutcome> {
        let selection = decode(
            catalog,
            &solution.variable_values,
            topology,
            target,
            self.config.integrality_tolerance,
        )?;
        if solution.quality.max_integrality_violation > 0.0 {
            log::debug!(
                "snapped integrality residue of {:e}",
                solution.quality.max_integrality_violation
            );
        }
        log::info!(
            "{} {} resistor(s) in {} give {:.3} for target {}",
            if status == FitStatus::Optimal { "optimal:" } else { "best known:" },
            selection.len(),
            topology,
            selection.realized,
            target
        );
        Ok(FitOutcome {
            topology,
            target,
            selection,
            status,
            statistics: solution.statistics,
        })
    }
}

/// [`ResistorFitter::solve_error_minimizing`] with the default solver and configuration.
pub fn solve_error_minimizing(
    catalog: &[f64],
    target: f64,
    topology: Topology,
) -> FitResult<FitOutcome> {
    let catalog = Catalog::new(catalog)?;
    ResistorFitter::from_config(SolverConfig::default())?
        .solve_error_minimizing(&catalog, target, topology)
}

/// [`ResistorFitter::solve_min_cardinality`] with the default solver and configuration.
pub fn solve_min_cardinality(
    catalog: &[f64],
    target: f64,
    topology: Topology,
    tolerance: f64,
) -> FitResult<FitAnswer> {
    let catalog = Catalog::new(catalog)?;
    ResistorFitter::from_config(SolverConfig::default())?
        .solve_min_cardinality(&catalog, target, topology, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SolutionQuality;
    use crate::domain::solver_service::Result as SolverResult;
    use std::sync::Mutex;

    /// Replays a canned engine answer and records the problem it was given.
    struct ScriptedSolver {
        answer: Box<dyn Fn(&OptimizationProblem) -> Solution + Send + Sync>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedSolver {
        fn new(answer: impl Fn(&OptimizationProblem) -> Solution + Send + Sync + 'static) -> Self {
            Self {
                answer: Box::new(answer),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl SolverService for ScriptedSolver {
        fn solve(&self, problem: &OptimizationProblem) -> SolverResult<Solution> {
            self.validate(problem)?;
            self.seen.lock().unwrap().push(problem.name.clone());
            let solution = (self.answer)(problem);
            let quality = SolutionQuality::measure(problem, &solution.variable_values);
            Ok(solution.with_quality(quality))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn fitter(answer: impl Fn(&OptimizationProblem) -> Solution + Send + Sync + 'static) -> ResistorFitter {
        ResistorFitter::new(Arc::new(ScriptedSolver::new(answer)), SolverConfig::default())
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap()
    }

    #[test]
    fn optimal_values_are_decoded_in_catalog_order() {
        let fitter = fitter(|_| Solution::optimal(0.0, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]));
        let outcome = fitter
            .solve_error_minimizing(&catalog(), 11.0, Topology::Series)
            .unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(outcome.selected(), &[4.0, 7.0]);
        assert_eq!(outcome.selected_indices(), &[3, 6]);
        assert_eq!(outcome.error_pct(), Some(0.0));
    }

    #[test]
    fn looser_integrality_tolerance_snaps_near_integral_flags() {
        let answer = |_: &OptimizationProblem| {
            Solution::optimal(2.0, vec![0.0, 0.0, 0.0, 0.98, 0.0, 0.0, 1.0])
        };
        let config = SolverConfig::default().with_integrality_tolerance(0.05);
        let fitter = ResistorFitter::new(Arc::new(ScriptedSolver::new(answer)), config);
        assert_eq!(fitter.config().integrality_tolerance, 0.05);

        let outcome = fitter
            .solve_min_cardinality(&catalog(), 11.0, Topology::Series, 0.0)
            .unwrap()
            .into_outcome()
            .unwrap();
        assert_eq!(outcome.selected(), &[4.0, 7.0]);
    }

    #[test]
    fn non_optimal_error_fit_is_a_defect() {
        let fitter = fitter(|_| Solution::new(SolutionStatus::Infeasible, "no feasible point"));
        let err = fitter
            .solve_error_minimizing(&catalog(), 11.0, Topology::Series)
            .unwrap_err();
        assert!(matches!(err, FitError::SolverDefect(_)));
        assert!(err.to_string().contains("no feasible point"), "{}", err);
    }

    #[test]
    fn fractional_flag_is_a_defect() {
        let fitter = fitter(|_| Solution::optimal(0.0, vec![0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let err = fitter
            .solve_error_minimizing(&catalog(), 11.0, Topology::Series)
            .unwrap_err();
        assert!(matches!(err, FitError::SolverDefect(_)));
    }

    #[test]
    fn infeasible_band_is_no_solution() {
        let fitter = fitter(|_| Solution::new(SolutionStatus::Infeasible, "empty band"));
        let answer = fitter
            .solve_min_cardinality(&catalog(), 100.0, Topology::Series, 0.0)
            .unwrap();
        assert!(matches!(answer, FitAnswer::NoSolution));
        assert!(answer.selected().is_empty());
    }

    #[test]
    fn unbounded_band_is_a_defect() {
        let fitter = fitter(|_| Solution::new(SolutionStatus::Unbounded, "ray found"));
        let err = fitter
            .solve_min_cardinality(&catalog(), 10.0, Topology::Series, 0.1)
            .unwrap_err();
        assert!(matches!(err, FitError::SolverDefect(_)));
        assert!(err.to_string().contains("ray found"), "{}", err);
    }

    #[test]
    fn invalid_inputs_never_reach_the_solver() {
        let solver = Arc::new(ScriptedSolver::new(|_| Solution::optimal(0.0, Vec::new())));
        let fitter = ResistorFitter::new(solver.clone(), SolverConfig::default());

        assert!(matches!(
            fitter.solve_error_minimizing(&catalog(), 0.0, Topology::Parallel),
            Err(FitError::InvalidInput(_))
        ));
        assert!(matches!(
            fitter.solve_min_cardinality(&catalog(), 10.0, Topology::Series, 1.0),
            Err(FitError::InvalidInput(_))
        ));
        assert!(matches!(
            solve_error_minimizing(&[], 1.0, Topology::Series),
            Err(FitError::InvalidInput(_))
        ));
        assert!(solver.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn feasible_incumbent_after_time_limit_is_best_known() {
        // Select 4 and 7 against target 12: abs error 1 is a valid incumbent.
        let fitter = ResistorFitter::new(
            Arc::new(ScriptedSolver::new(|_| {
                Solution::time_limited(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0])
            })),
            SolverConfig::default().with_time_limit(0.5),
        );
        let outcome = fitter
            .solve_error_minimizing(&catalog(), 12.0, Topology::Series)
            .unwrap();
        assert_eq!(outcome.status, FitStatus::BudgetExhausted);
        assert_eq!(outcome.selected(), &[4.0, 7.0]);
    }

    #[test]
    fn time_limit_without_incumbent_is_an_error() {
        let fitter = ResistorFitter::new(
            Arc::new(ScriptedSolver::new(|_| Solution::time_limited(Vec::new()))),
            SolverConfig::default().with_time_limit(0.5),
        );
        let err = fitter
            .solve_min_cardinality(&catalog(), 10.0, Topology::Series, 0.1)
            .unwrap_err();
        assert!(matches!(err, FitError::BudgetExhausted { limit_secs } if limit_secs == 0.5));
    }

    #[test]
    fn infeasible_incumbent_after_time_limit_is_rejected() {
        // abs_error of 0 understates |11 - 12|, so the point violates the linearisation.
        let fitter = ResistorFitter::new(
            Arc::new(ScriptedSolver::new(|_| {
                Solution::time_limited(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0])
            })),
            SolverConfig::default().with_time_limit(0.5),
        );
        let err = fitter
            .solve_error_minimizing(&catalog(), 12.0, Topology::Series)
            .unwrap_err();
        assert!(matches!(err, FitError::BudgetExhausted { .. }));
    }

    #[test]
    fn each_call_builds_a_fresh_model() {
        let solver = Arc::new(ScriptedSolver::new(|problem| {
            Solution::optimal(0.0, vec![0.0; problem.num_variables()])
        }));
        let fitter = ResistorFitter::new(solver.clone(), SolverConfig::default());

        fitter
            .solve_error_minimizing(&catalog(), 2.0, Topology::Parallel)
            .unwrap();
        fitter
            .solve_min_cardinality(&catalog(), 2.0, Topology::Parallel, 0.1)
            .unwrap();
        assert_eq!(
            *solver.seen.lock().unwrap(),
            vec!["parallel_min_error".to_string(), "parallel_min_count".to_string()]
        );
    }
}
