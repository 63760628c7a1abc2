// COIN-OR CBC Solver Adapter, driven through good_lp

use crate::domain::{
    models::{OptimizationProblem, Solution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, SolutionStatus, VariableType},
};
use good_lp::{
    solvers::{coin_cbc, SolutionStatus as EngineStatus, WithMipGap, WithTimeLimit},
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolutionTrait,
    SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(problem.variables.len());

        for var_def in &problem.variables {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = match var_def.variable_type {
                VariableType::Binary => vars.add(variable().binary()),
                VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
            };
            lp_variables.push(var);
        }

        let linear = |coefficients: &[f64]| {
            let mut expr: Expression = 0.into();
            for (&coeff, &var) in coefficients.iter().zip(&lp_variables) {
                if coeff != 0.0 {
                    expr += coeff * var;
                }
            }
            expr
        };

        let mut lp_model = vars
            .minimise(linear(&problem.objective.coefficients))
            .using(coin_cbc::coin_cbc);

        if !config.verbose {
            lp_model.set_parameter("log", "0");
        }
        if let Some(limit) = config.time_limit {
            lp_model = lp_model.with_time_limit(limit);
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model = lp_model.with_mip_gap(gap as f32).map_err(|e| {
                SolverError::InvalidProblem(format!("gap tolerance {} rejected: {}", gap, e))
            })?;
        }

        for constraint in &problem.constraints {
            let lhs = linear(&constraint.coefficients);
            lp_model = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
            };
        }

        let solution_result = lp_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);

        let solution = match solution_result {
            Ok(sol) => {
                let values: Vec<f64> = lp_variables.iter().map(|&var| sol.value(var)).collect();
                match sol.status() {
                    // CBC stopped on `seconds`; the values are its incumbent, if it had one.
                    EngineStatus::TimeLimit => Solution::time_limited(values),
                    // Proven optimal, or stopped inside the requested MIP gap.
                    _ => {
                        let objective = problem.objective.value_at(&values);
                        let mut solution = Solution::optimal(objective, values);
                        solution.message =
                            format!("Optimal solution found for '{}'", problem.name);
                        solution
                    }
                }
            }
            Err(ResolutionError::Infeasible) => Solution::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            Err(ResolutionError::Unbounded) => Solution::new(
                SolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            ),
            Err(e) => return Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        };

        let quality = SolutionQuality::measure(problem, &solution.variable_values);
        Ok(solution.with_statistics(statistics).with_quality(quality))
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }
}
