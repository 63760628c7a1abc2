//! The parts bin a fit draws from, plus checks on the scalar inputs of a fit.

use std::ops::Deref;

use super::fit_error::{FitError, FitResult};

/// Ordered resistor values available for selection.
///
/// Position is identity: two entries with the same value are two physical parts and may
/// both be chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    values: Vec<f64>,
}

impl Catalog {
    /// Build a catalog, rejecting empty input and any value that is not a positive finite number.
    pub fn new(values: impl Into<Vec<f64>>) -> FitResult<Self> {
        let values = values.into();
        if values.is_empty() {
            return Err(FitError::invalid_input("catalog must contain at least one resistor"));
        }
        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(FitError::invalid_input(format!(
                "catalog entry {} must be a positive finite resistance, found {}",
                index, value
            )));
        }
        Ok(Self { values })
    }

    /// Every integer resistance in `start..end`.
    pub fn range(start: u32, end: u32) -> FitResult<Self> {
        Self::new((start..end).map(f64::from).collect::<Vec<_>>())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Deref for Catalog {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values
    }
}

/// Reject targets that are zero, negative or not finite.
pub fn check_target(target: f64) -> FitResult<f64> {
    if target.is_finite() && target > 0.0 {
        Ok(target)
    } else {
        Err(FitError::invalid_input(format!(
            "target resistance must be a positive finite number, found {}",
            target
        )))
    }
}

/// Tolerance is a relative band half-width in `[0, 1)`.
pub fn check_tolerance(tolerance: f64) -> FitResult<f64> {
    if (0.0..1.0).contains(&tolerance) {
        Ok(tolerance)
    } else {
        Err(FitError::invalid_input(format!(
            "tolerance must lie in [0, 1), found {}",
            tolerance
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_duplicates() {
        let catalog = Catalog::new(vec![4.7, 1.0, 4.7]).unwrap();
        assert_eq!(catalog.values(), &[4.7, 1.0, 4.7]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn range_excludes_end() {
        let catalog = Catalog::range(1, 8).unwrap();
        assert_eq!(catalog.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn rejects_empty_and_non_positive_entries() {
        assert!(matches!(
            Catalog::new(Vec::new()),
            Err(FitError::InvalidInput(_))
        ));
        assert!(matches!(Catalog::range(5, 5), Err(FitError::InvalidInput(_))));

        let err = Catalog::new(vec![1.0, 0.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
        assert!(Catalog::new(vec![-3.0]).is_err());
        assert!(Catalog::new(vec![f64::NAN]).is_err());
        assert!(Catalog::new(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn target_must_be_positive() {
        assert_eq!(check_target(1.5).unwrap(), 1.5);
        assert!(check_target(0.0).is_err());
        assert!(check_target(-1.0).is_err());
        assert!(check_target(f64::NAN).is_err());
    }

    #[test]
    fn tolerance_band_is_half_open() {
        assert_eq!(check_tolerance(0.0).unwrap(), 0.0);
        assert_eq!(check_tolerance(0.1).unwrap(), 0.1);
        assert!(check_tolerance(1.0).is_err());
        assert!(check_tolerance(-0.01).is_err());
        assert!(check_tolerance(f64::NAN).is_err());
    }
}
