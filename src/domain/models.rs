use super::value_objects::{ConstraintType, SolutionStatus, SolverBackend, VariableType};

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn is_binary(&self) -> bool {
        self.variable_type == VariableType::Binary
    }
}

/// Linear objective, always minimised
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    pub fn minimize(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Evaluate the objective at the given point
    pub fn value_at(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }
}

/// Linear constraint on variables: `coefficients · x (≤|≥) bound`
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub coefficients: Vec<f64>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, coefficients: Vec<f64>, bound: f64) -> Self {
        Self {
            constraint_type,
            coefficients,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// How far the point lies outside the feasible half-space (0 when satisfied)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs: f64 = self
            .coefficients
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum();
        match self.constraint_type {
            ConstraintType::LessThanOrEqual => (lhs - self.bound).max(0.0),
            ConstraintType::GreaterThanOrEqual => (self.bound - lhs).max(0.0),
        }
    }
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock budget in seconds
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which the engine may stop
    pub gap_tolerance: Option<f64>,
    pub verbose: bool,
    /// Largest distance from 0 or 1 accepted for a binary variable
    pub integrality_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: None,
            gap_tolerance: None,
            verbose: false,
            integrality_tolerance: 1e-6,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_gap_tolerance(mut self, gap: f64) -> Self {
        self.gap_tolerance = Some(gap);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }
}

/// Complete optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver_config: SolverConfig,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_binary()).count()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_problem(problem: &OptimizationProblem, solve_time_ms: f64) -> Self {
        Self {
            solve_time_ms,
            num_variables: problem.num_variables() as u32,
            num_constraints: problem.constraints.len() as u32,
            num_binary_vars: problem.num_binary_variables() as u32,
        }
    }
}

/// Quality metrics for the solution
#[derive(Debug, Clone, Default)]
pub struct SolutionQuality {
    pub max_constraint_violation: f64,
    pub max_integrality_violation: f64,
}

impl SolutionQuality {
    /// Measure how well `values` satisfies the constraints, bounds and integrality of `problem`.
    pub fn measure(problem: &OptimizationProblem, values: &[f64]) -> Self {
        let mut max_constraint_violation = problem
            .constraints
            .iter()
            .map(|c| c.violation(values))
            .fold(0.0, f64::max);

        let mut max_integrality_violation: f64 = 0.0;
        for (var, &value) in problem.variables.iter().zip(values) {
            let below = (var.lower_bound - value).max(0.0);
            let above = var.upper_bound.map_or(0.0, |ub| (value - ub).max(0.0));
            max_constraint_violation = max_constraint_violation.max(below).max(above);

            if var.is_binary() {
                max_integrality_violation =
                    max_integrality_violation.max((value - value.round()).abs());
            }
        }

        Self {
            max_constraint_violation,
            max_integrality_violation,
        }
    }

    pub fn is_acceptable(&self, tolerance: f64) -> bool {
        self.max_constraint_violation <= tolerance && self.max_integrality_violation <= tolerance
    }
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
    pub quality: SolutionQuality,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    /// Budget ran out; `variable_values` is the engine's incumbent, possibly empty.
    pub fn time_limited(variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::TimeLimit,
            objective_value: None,
            variable_values,
            message: "Time limit reached before optimality was proven".to_string(),
            statistics: SolverStatistics::default(),
            quality: SolutionQuality::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_quality(mut self, quality: SolutionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn has_values(&self) -> bool {
        !self.variable_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_problem() -> OptimizationProblem {
        OptimizationProblem::new(ObjectiveFunction::minimize(vec![0.0, 1.0]))
            .with_variables(vec![Variable::binary("x"), Variable::continuous("a")])
            .add_constraint(Constraint::new(
                ConstraintType::GreaterThanOrEqual,
                vec![-3.0, 1.0],
                -2.0,
            ))
    }

    #[test]
    fn quality_of_feasible_point_is_zero() {
        let problem = two_var_problem();
        let quality = SolutionQuality::measure(&problem, &[1.0, 1.0]);
        assert_eq!(quality.max_constraint_violation, 0.0);
        assert_eq!(quality.max_integrality_violation, 0.0);
        assert!(quality.is_acceptable(1e-9));
    }

    #[test]
    fn quality_flags_fractional_binary_and_violated_row() {
        let problem = two_var_problem();
        // -3 * 0.9 + 0 = -2.7 < -2
        let quality = SolutionQuality::measure(&problem, &[0.9, 0.0]);
        assert!((quality.max_integrality_violation - 0.1).abs() < 1e-12);
        assert!((quality.max_constraint_violation - 0.7).abs() < 1e-12);
        assert!(!quality.is_acceptable(1e-6));
    }

    #[test]
    fn quality_counts_bound_violations() {
        let problem = two_var_problem();
        let quality = SolutionQuality::measure(&problem, &[0.0, -0.5]);
        assert!((quality.max_constraint_violation - 0.5).abs() < 1e-12);
    }

    #[test]
    fn objective_value_at_point() {
        let objective = ObjectiveFunction::minimize(vec![2.0, 0.5]);
        assert_eq!(objective.value_at(&[1.0, 4.0]), 4.0);
    }
}
