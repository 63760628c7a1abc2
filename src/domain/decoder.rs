//! Turns solver flag values back into resistors and a realized resistance.

use std::fmt;

use super::catalog::Catalog;
use super::fit_error::{FitError, FitResult};
use super::value_objects::Topology;

/// Resistance of a combination of parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Realized {
    Finite(f64),
    /// Nothing selected in parallel: an open circuit
    Infinite,
}

impl Realized {
    pub fn value(&self) -> Option<f64> {
        match self {
            Realized::Finite(r) => Some(*r),
            Realized::Infinite => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Realized::Finite(_))
    }

    /// `100 × (realized − target) / target`, undefined for an open circuit
    pub fn error_pct(&self, target: f64) -> Option<f64> {
        self.value().map(|r| 100.0 * (r - target) / target)
    }
}

impl fmt::Display for Realized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Realized::Finite(r) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, r),
                None => write!(f, "{}", r),
            },
            Realized::Infinite => write!(f, "open circuit"),
        }
    }
}

/// Combined resistance of `values` wired in `topology`.
pub fn combine(values: &[f64], topology: Topology) -> Realized {
    match topology {
        Topology::Series => Realized::Finite(values.iter().sum()),
        Topology::Parallel if values.is_empty() => Realized::Infinite,
        Topology::Parallel => Realized::Finite(1.0 / values.iter().map(|r| 1.0 / r).sum::<f64>()),
    }
}

/// Chosen subset of a catalog together with what it achieves
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Catalog positions, ascending
    pub indices: Vec<usize>,
    /// Catalog values at `indices`
    pub values: Vec<f64>,
    pub realized: Realized,
    pub error_pct: Option<f64>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Decode the first `catalog.len()` entries of `flags` as the selection.
///
/// Flags within `integrality_tolerance` of 0 or 1 are snapped; anything else means the
/// engine broke integrality and is reported as a [`FitError::SolverDefect`].
pub fn decode(
    catalog: &Catalog,
    flags: &[f64],
    topology: Topology,
    target: f64,
    integrality_tolerance: f64,
) -> FitResult<Selection> {
    if flags.len() < catalog.len() {
        return Err(FitError::solver_defect(format!(
            "solver returned {} values for {} candidates",
            flags.len(),
            catalog.len()
        )));
    }

    let mut indices = Vec::new();
    for (index, &flag) in flags[..catalog.len()].iter().enumerate() {
        if flag.abs() <= integrality_tolerance {
            continue;
        }
        if (flag - 1.0).abs() <= integrality_tolerance {
            indices.push(index);
            continue;
        }
        return Err(FitError::solver_defect(format!(
            "binary flag for candidate {} resolved to {}",
            index, flag
        )));
    }

    let values: Vec<f64> = indices.iter().map(|&i| catalog[i]).collect();
    let realized = combine(&values, topology);
    Ok(Selection {
        indices,
        values,
        realized,
        error_pct: realized.error_pct(target),
    })
}
