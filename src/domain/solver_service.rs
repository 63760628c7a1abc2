// Domain service interface for solving optimization problems
// Defines the contract that any solver backend must follow

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// Every call builds its own engine instance from `problem`; implementations hold no
/// per-solve state, so one service may be shared across threads.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }

        let num_vars = problem.num_variables();

        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} '{}' has {} coefficients but problem has {} variables",
                    i,
                    constraint.name,
                    constraint.num_variables(),
                    num_vars
                ));
            }
            if !constraint.bound.is_finite() {
                errors.push(format!(
                    "Constraint {} '{}' has non-finite bound {}",
                    i, constraint.name, constraint.bound
                ));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Constraint, ObjectiveFunction, Variable};
    use crate::domain::value_objects::ConstraintType;

    struct NullSolver;

    impl SolverService for NullSolver {
        fn solve(&self, _problem: &OptimizationProblem) -> Result<Solution> {
            Err(SolverError::SolverNotAvailable("null".to_string()))
        }

        fn name(&self) -> &str {
            "null"
        }
    }

    #[test]
    fn validate_accepts_consistent_problem() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0, 1.0]))
            .with_variables(vec![Variable::binary("r0"), Variable::binary("r1")])
            .add_constraint(Constraint::new(
                ConstraintType::LessThanOrEqual,
                vec![1.0, 2.0],
                2.0,
            ));
        assert!(NullSolver.validate(&problem).is_ok());
    }

    #[test]
    fn validate_reports_every_shape_mismatch() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0, 1.0]))
            .with_variables(vec![
                Variable::binary("r0"),
                Variable::continuous("a").with_bounds(2.0, Some(1.0)),
            ])
            .add_constraint(
                Constraint::new(ConstraintType::LessThanOrEqual, vec![1.0], f64::NAN)
                    .with_name("band"),
            );

        let err = NullSolver.validate(&problem).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'band' has 1 coefficients"));
        assert!(message.contains("non-finite bound"));
        assert!(message.contains("lower bound (2) > upper bound (1)"));
    }

    #[test]
    fn validate_rejects_missing_variables() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0]));
        assert!(matches!(
            NullSolver.validate(&problem),
            Err(SolverError::InvalidProblem(_))
        ));
    }
}
