//! Maps both topologies onto one additive problem.
//!
//! Series resistances add directly. Parallel conductances add, so a parallel fit over
//! resistances `r_i` towards `T` is the same additive fit over `1/r_i` towards `1/T`.
//! Either way the achieved value is linear in the selection flags.

use super::catalog::{check_target, Catalog};
use super::fit_error::FitResult;
use super::value_objects::Topology;

/// Catalog and target rewritten into the domain where selected values simply add.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingDomain {
    pub topology: Topology,
    /// One working value per catalog entry, same order
    pub values: Vec<f64>,
    pub target: f64,
}

/// Closed interval on the working sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

impl WorkingDomain {
    pub fn new(catalog: &Catalog, target: f64, topology: Topology) -> FitResult<Self> {
        let target = check_target(target)?;
        let (values, target) = match topology {
            Topology::Series => (catalog.values().to_vec(), target),
            // Catalog entries are already known to be positive.
            Topology::Parallel => (catalog.iter().map(|r| 1.0 / r).collect(), 1.0 / target),
        };
        Ok(Self {
            topology,
            values,
            target,
        })
    }

    /// Working-sum interval whose image in the original domain is
    /// `[(1 - tolerance) * target, (1 + tolerance) * target]`.
    ///
    /// `original_target` is the caller's target, not the working one.
    pub fn tolerance_band(&self, original_target: f64, tolerance: f64) -> Band {
        let low = (1.0 - tolerance) * original_target;
        let high = (1.0 + tolerance) * original_target;
        match self.topology {
            Topology::Series => Band {
                lower: low,
                upper: high,
            },
            // Reciprocation reverses the order of positive numbers.
            Topology::Parallel => Band {
                lower: 1.0 / high,
                upper: 1.0 / low,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
