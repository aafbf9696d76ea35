//! Size constraints declared through `@Size` annotations
//!
//! A constraint is an optional inclusive lower bound, an optional inclusive
//! upper bound and an optional "multiple of" divisor. Containment compares the
//! declared shape of two constraints, not the sets of values they accept: an
//! open-ended constraint (`at_least` or `at_most` alone) never contains, and is
//! never contained by, a constraint with a different shape.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("size bound must not be negative (was {0})")]
    NegativeBound(i64),
    #[error("lower bound {min} is greater than upper bound {max}")]
    InvertedRange { min: i64, max: i64 },
    #[error("multiple must be positive (was {0})")]
    NonPositiveMultiple(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SizeConstraint {
    min: Option<i64>,
    max: Option<i64>,
    multiple: Option<i64>,
}

/// Shape of the bound clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bounds {
    Unbounded,
    LowerOpen,
    UpperOpen,
    Closed,
}

impl SizeConstraint {
    fn new(min: Option<i64>, max: Option<i64>, multiple: Option<i64>) -> Result<Self, ConstraintError> {
        for bound in [min, max].into_iter().flatten() {
            if bound < 0 {
                return Err(ConstraintError::NegativeBound(bound));
            }
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ConstraintError::InvertedRange { min, max });
            }
        }
        if let Some(m) = multiple {
            if m <= 0 {
                return Err(ConstraintError::NonPositiveMultiple(m));
            }
        }
        Ok(Self { min, max, multiple })
    }

    pub fn exactly(n: i64) -> Result<Self, ConstraintError> {
        Self::new(Some(n), Some(n), None)
    }

    pub fn range(min: i64, max: i64) -> Result<Self, ConstraintError> {
        Self::new(Some(min), Some(max), None)
    }

    pub fn at_least(min: i64) -> Result<Self, ConstraintError> {
        Self::new(Some(min), None, None)
    }

    pub fn at_most(max: i64) -> Result<Self, ConstraintError> {
        Self::new(None, Some(max), None)
    }

    pub fn multiple(multiple: i64) -> Result<Self, ConstraintError> {
        Self::new(None, None, Some(multiple))
    }

    pub fn range_with_multiple(min: i64, max: i64, multiple: i64) -> Result<Self, ConstraintError> {
        Self::new(Some(min), Some(max), Some(multiple))
    }

    /// Build from the optional clauses of an annotation; `None` when no clause is given
    pub fn from_parts(
        min: Option<i64>,
        max: Option<i64>,
        multiple: Option<i64>,
    ) -> Result<Option<Self>, ConstraintError> {
        if min.is_none() && max.is_none() && multiple.is_none() {
            return Ok(None);
        }
        Self::new(min, max, multiple).map(Some)
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    pub fn multiple_of(&self) -> Option<i64> {
        self.multiple
    }

    fn exact(&self) -> Option<i64> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => Some(min),
            _ => None,
        }
    }

    fn bounds(&self) -> Bounds {
        match (self.min, self.max) {
            (None, None) => Bounds::Unbounded,
            (Some(_), None) => Bounds::LowerOpen,
            (None, Some(_)) => Bounds::UpperOpen,
            (Some(_), Some(_)) => Bounds::Closed,
        }
    }

    pub fn is_satisfied_by(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min)
            && self.max.map_or(true, |max| value <= max)
            && self.multiple.map_or(true, |m| value % m == 0)
    }

    /// English description, e.g. `Size must be at least 1 and at most 5`
    pub fn describe(&self) -> String {
        format!("Size must be {}", self.clauses())
    }

    /// The clauses of [`describe`](Self::describe), e.g. `at least 1 and at most 5`
    pub fn clauses(&self) -> String {
        let mut clauses = Vec::new();
        if let Some(exact) = self.exact() {
            clauses.push(format!("exactly {exact}"));
        } else {
            if let Some(min) = self.min {
                clauses.push(format!("at least {min}"));
            }
            if let Some(max) = self.max {
                clauses.push(format!("at most {max}"));
            }
        }
        if let Some(m) = self.multiple {
            clauses.push(format!("a multiple of {m}"));
        }
        clauses.join(" and ")
    }

    /// Description of `value` against this constraint, naming the violated clause
    pub fn describe_value(&self, value: i64) -> String {
        if let Some(exact) = self.exact() {
            if value != exact {
                return format!("Expected Size to be exactly {exact} (was {value})");
            }
        }
        if let Some(min) = self.min {
            if value < min {
                return format!("Expected Size ≥ {min} (was {value})");
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return format!("Expected Size ≤ {max} (was {value})");
            }
        }
        if let Some(m) = self.multiple {
            if value % m != 0 {
                // Neighbours outside the i64 range are not suggested
                let quotient = value.div_euclid(m);
                let below = quotient.checked_mul(m);
                let above = quotient.checked_add(1).and_then(|q| q.checked_mul(m));
                return match (below, above) {
                    (Some(below), Some(above)) => format!(
                        "Expected Size to be a multiple of {m} (was {value} and should be either {below} or {above})"
                    ),
                    (Some(near), None) | (None, Some(near)) => format!(
                        "Expected Size to be a multiple of {m} (was {value} and should be {near})"
                    ),
                    (None, None) => format!("Expected Size to be a multiple of {m} (was {value})"),
                };
            }
        }
        format!("{} (was {value})", self.describe())
    }

    /// True iff every value allowed by `other` is allowed by `self`, judged by declared shape
    pub fn contains(&self, other: &SizeConstraint) -> bool {
        let bounds_ok = match (self.bounds(), other.bounds()) {
            (Bounds::LowerOpen, Bounds::LowerOpen) => other.min >= self.min,
            (Bounds::UpperOpen, Bounds::UpperOpen) => other.max <= self.max,
            (Bounds::LowerOpen | Bounds::UpperOpen, _) | (_, Bounds::LowerOpen | Bounds::UpperOpen) => false,
            _ => {
                let lower = self
                    .min
                    .map_or(true, |min| other.min.is_some_and(|o| o >= min));
                let upper = self
                    .max
                    .map_or(true, |max| other.max.is_some_and(|o| o <= max));
                lower && upper
            }
        };
        let multiple_ok = self
            .multiple
            .map_or(true, |m| other.multiple.is_some_and(|o| o % m == 0));
        bounds_ok && multiple_ok
    }
}

impl fmt::Display for SizeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
