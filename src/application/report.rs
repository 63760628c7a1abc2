// Human readable rendering of fit results

use std::fmt;

use super::resistor_fitter::{FitAnswer, FitOutcome, FitStatus};
use crate::domain::decoder::Realized;

struct ValueList<'a>(&'a [f64]);

impl fmt::Display for ValueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for FitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resistors {} in {} will produce ",
            ValueList(self.selected()),
            self.topology
        )?;
        match (self.realized(), self.error_pct()) {
            (Realized::Finite(r), Some(error)) => write!(
                f,
                "R={:.3}. Aiming for R={:.3}, error of {:.2}%",
                r, self.target, error
            )?,
            _ => write!(
                f,
                "an open circuit. Aiming for R={:.3}",
                self.target
            )?,
        }
        if self.status == FitStatus::BudgetExhausted {
            write!(f, " (time limit reached, best known)")?;
        }
        Ok(())
    }
}

impl fmt::Display for FitAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitAnswer::Found(outcome) => outcome.fmt(f),
            FitAnswer::NoSolution => write!(f, "No solution found"),
        }
    }
}
