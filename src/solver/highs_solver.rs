// HiGHS Solver Adapter
// Translates the domain model into a HiGHS row problem, one engine instance per solve

use crate::domain::{
    models::{OptimizationProblem, Solution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus, VariableType},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.variables.len());

        for (var_def, &obj_coeff) in problem
            .variables
            .iter()
            .zip(&problem.objective.coefficients)
        {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = match var_def.variable_type {
                VariableType::Binary => pb.add_integer_column(obj_coeff, lower..=upper),
                VariableType::Continuous => pb.add_column(obj_coeff, lower..=upper),
            };
            cols.push(col);
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .zip(&cols)
                .filter(|(&coeff, _)| coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let mut model = pb.optimise(Sense::Minimise);
        if !config.verbose {
            model.make_quiet();
        }
        if let Some(limit) = config.time_limit {
            model.set_option("time_limit", limit);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.try_solve().map_err(|status| {
            SolverError::ExecutionFailed(format!("HiGHS failed to run: {:?}", status))
        })?;
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);

        let solution = match solved.status() {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective = problem.objective.value_at(&values);
                let mut solution = Solution::optimal(objective, values);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                solution
            }
            HighsModelStatus::Infeasible => Solution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            // Every column bounded on both sides: the model cannot be unbounded.
            HighsModelStatus::UnboundedOrInfeasible
                if problem.variables.iter().all(|v| v.upper_bound.is_some()) =>
            {
                Solution::new(
                    SolutionStatus::Infeasible,
                    "Problem is infeasible: presolve ruled out every bounded point",
                )
            }
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Solution::new(
                    SolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
            }
            HighsModelStatus::ReachedTimeLimit => {
                Solution::time_limited(solved.get_solution().columns().to_vec())
            }
            status => Solution::new(
                SolutionStatus::Other,
                format!("HiGHS stopped with status {:?}", status),
            ),
        };

        let quality = SolutionQuality::measure(problem, &solution.variable_values);
        Ok(solution.with_statistics(statistics).with_quality(quality))
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, ObjectiveFunction, Variable};
    use approx::assert_abs_diff_eq;

    #[test]
    fn knapsack_style_binary_problem_is_solved() {
        // min -(3a + 2b + 4c)  s.t.  2a + b + 3c <= 4
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![-3.0, -2.0, -4.0]))
            .with_variables(vec![
                Variable::binary("a"),
                Variable::binary("b"),
                Variable::binary("c"),
            ])
            .add_constraint(Constraint::new(
                ConstraintType::LessThanOrEqual,
                vec![2.0, 1.0, 3.0],
                4.0,
            ));

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert!(solution.is_optimal());
        assert_abs_diff_eq!(solution.objective_value.unwrap(), -6.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.variable_values[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.variable_values[2], 1.0, epsilon = 1e-6);
        assert!(solution.quality.max_integrality_violation < 1e-6);
        assert_eq!(solution.statistics.num_binary_vars, 3);
    }

    #[test]
    fn infeasible_binary_problem_is_reported() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0, 1.0]))
            .with_variables(vec![Variable::binary("a"), Variable::binary("b")])
            .add_constraint(Constraint::new(
                ConstraintType::GreaterThanOrEqual,
                vec![1.0, 1.0],
                3.0,
            ));

        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(!solution.has_values());
    }

    #[test]
    fn malformed_problem_is_rejected_before_solving() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0]));
        assert!(matches!(
            HighsSolver::new().solve(&problem),
            Err(SolverError::InvalidProblem(_))
        ));
    }

    #[test]
    fn time_limited_run_is_never_reported_optimal() {
        let problem = crate::solver::testing::slow_count_model(0.01);
        let solution = HighsSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::TimeLimit);
        assert!(solution.objective_value.is_none());
        if solution.has_values() {
            assert_eq!(solution.variable_values.len(), problem.num_variables());
        }
    }
}
