//! Builds the mixed-integer model for a resistor fit.
//!
//! Variables `0..n` are the in-use flags of the catalog entries, in catalog order. The
//! achieved working value is `Σ w_i·x_i`. Error-minimization mode appends one continuous
//! variable holding `|Σ w_i·x_i − t|`; cardinality mode adds no variables.

use super::models::{Constraint, ObjectiveFunction, OptimizationProblem, SolverConfig, Variable};
use super::transform::{Band, WorkingDomain};
use super::value_objects::ConstraintType;

/// What the model optimises
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitMode {
    /// Smallest absolute deviation from the target, any number of parts
    MinimizeError,
    /// Fewest parts whose combination lands within `tolerance` of the target
    MinimizeCount { tolerance: f64 },
}

/// Sparse affine expression `Σ coef·x[index] + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(usize, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new(terms: Vec<(usize, f64)>, constant: f64) -> Self {
        Self { terms, constant }
    }

    pub fn plus_constant(mut self, constant: f64) -> Self {
        self.constant += constant;
        self
    }

    pub fn plus_term(mut self, index: usize, coefficient: f64) -> Self {
        self.terms.push((index, coefficient));
        self
    }

    pub fn negated(mut self) -> Self {
        for (_, c) in &mut self.terms {
            *c = -*c;
        }
        self.constant = -self.constant;
        self
    }
}

/// Incrementally assembled model; densified into an [`OptimizationProblem`] by [`build`](ModelBuilder::build).
#[derive(Debug, Default)]
pub struct ModelBuilder {
    variables: Vec<Variable>,
    objective: Vec<(usize, f64)>,
    rows: Vec<(String, ConstraintType, Vec<(usize, f64)>, f64)>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, variable: Variable) -> usize {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    /// Add the row `expr (≤|≥) rhs`; the expression's constant moves to the right-hand side.
    pub fn add_row(
        &mut self,
        name: impl Into<String>,
        expr: &LinearExpr,
        constraint_type: ConstraintType,
        rhs: f64,
    ) {
        self.rows.push((
            name.into(),
            constraint_type,
            expr.terms.clone(),
            rhs - expr.constant,
        ));
    }

    /// The constant part of `expr` does not affect the minimiser and is dropped.
    pub fn minimize(&mut self, expr: &LinearExpr) {
        self.objective = expr.terms.clone();
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn build(self, name: impl Into<String>, config: SolverConfig) -> OptimizationProblem {
        let n = self.variables.len();
        let dense = |terms: &[(usize, f64)]| {
            let mut coefficients = vec![0.0; n];
            for &(index, coefficient) in terms {
                coefficients[index] += coefficient;
            }
            coefficients
        };

        let mut problem = OptimizationProblem::new(ObjectiveFunction::minimize(dense(
            &self.objective,
        )))
        .with_name(name)
        .with_variables(self.variables)
        .with_config(config);

        for (name, constraint_type, terms, rhs) in &self.rows {
            problem = problem
                .add_constraint(Constraint::new(*constraint_type, dense(terms), *rhs).with_name(name));
        }
        problem
    }
}

/// Introduce `a ≥ 0` with `a ≥ error` and `a ≥ −error`, returning the index of `a`.
///
/// Once `a` is minimised it equals `|error|` at any optimum.
pub fn linearize_abs_error(model: &mut ModelBuilder, error: &LinearExpr) -> usize {
    let abs_error = model.add_variable(Variable::continuous("abs_error"));

    // a − error ≥ 0
    let upper = error.clone().negated().plus_term(abs_error, 1.0);
    model.add_row("abs_error_above", &upper, ConstraintType::GreaterThanOrEqual, 0.0);

    // a + error ≥ 0
    let lower = error.clone().plus_term(abs_error, 1.0);
    model.add_row("abs_error_below", &lower, ConstraintType::GreaterThanOrEqual, 0.0);

    abs_error
}

/// A built model plus where its pieces live.
#[derive(Debug, Clone)]
pub struct ResistorModel {
    pub problem: OptimizationProblem,
    /// Number of leading binary selection variables, one per catalog entry
    pub num_candidates: usize,
    /// Index of the linearised error variable in error-minimization mode
    pub abs_error: Option<usize>,
}

/// Assemble the model for `domain` under `mode`.
///
/// `original_target` is the caller's target; it is only needed to place the tolerance band.
pub fn build_model(
    domain: &WorkingDomain,
    original_target: f64,
    mode: FitMode,
    config: SolverConfig,
) -> ResistorModel {
    let mut model = ModelBuilder::new();

    let selection: Vec<usize> = (0..domain.len())
        .map(|i| model.add_variable(Variable::binary(format!("use_r{}", i))))
        .collect();

    let achieved = LinearExpr::new(
        selection
            .iter()
            .zip(&domain.values)
            .map(|(&x, &w)| (x, w))
            .collect(),
        0.0,
    );

    let (abs_error, name) = match mode {
        FitMode::MinimizeError => {
            let error = achieved.plus_constant(-domain.target);
            let abs_error = linearize_abs_error(&mut model, &error);
            model.minimize(&LinearExpr::new(vec![(abs_error, 1.0)], 0.0));
            (Some(abs_error), format!("{}_min_error", domain.topology))
        }
        FitMode::MinimizeCount { tolerance } => {
            let Band { lower, upper } = domain.tolerance_band(original_target, tolerance);
            model.add_row("band_lower", &achieved, ConstraintType::GreaterThanOrEqual, lower);
            model.add_row("band_upper", &achieved, ConstraintType::LessThanOrEqual, upper);
            model.minimize(&LinearExpr::new(
                selection.iter().map(|&x| (x, 1.0)).collect(),
                0.0,
            ));
            (None, format!("{}_min_count", domain.topology))
        }
    };

    log::debug!(
        "built model '{}': {} candidates, {} variables",
        name,
        selection.len(),
        model.num_variables()
    );

    ResistorModel {
        problem: model.build(name, config),
        num_candidates: selection.len(),
        abs_error,
    }
}
