//! Weight expression resolution.
//!
//! Percentages are taken of the day's lift max and rounded to the
//! configured plate increment. Literal weights pass through unchanged.

use crate::{Category, Error, Maxes, Result, WeightExpr, WeightUnit};

/// Rounding and unit policy shared by every percent-based set of a run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rounding {
    pub unit: WeightUnit,
    pub increment: f64,
}

impl Rounding {
    pub fn new(unit: WeightUnit, increment: f64) -> Result<Self> {
        if !increment.is_finite() || increment <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "rounding increment must be positive, got {}",
                increment
            )));
        }
        Ok(Self { unit, increment })
    }

    /// Unit default: 5 lbs or 2.5 kg
    pub fn for_unit(unit: WeightUnit) -> Self {
        Self {
            unit,
            increment: unit.default_increment(),
        }
    }

    /// Round to the nearest increment, halves rounding up.
    pub fn round(&self, weight: f64) -> f64 {
        let steps = (weight / self.increment + 0.5).floor();
        // Trim float noise such as 157.50000000000003
        let rounded = steps * self.increment;
        (rounded * 1000.0).round() / 1000.0
    }
}

impl Default for Rounding {
    fn default() -> Self {
        Self::for_unit(WeightUnit::default())
    }
}

/// A resolved weight and the unit it is displayed in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedWeight {
    pub value: f64,
    pub unit: WeightUnit,
}

/// Resolve a weight expression for an exercise under `category`.
///
/// `line` is the script line of the exercise, reported on a missing max.
pub fn resolve_weight(
    expr: &WeightExpr,
    category: &Category,
    maxes: &Maxes,
    rounding: &Rounding,
    line: usize,
) -> Result<ResolvedWeight> {
    match *expr {
        WeightExpr::Absolute { value, unit } => Ok(ResolvedWeight {
            value,
            unit: unit.unwrap_or(rounding.unit),
        }),
        WeightExpr::Percent(percent) => {
            let max = maxes
                .for_category(category)
                .ok_or_else(|| Error::MissingMax {
                    category: category.to_string(),
                    line,
                })?;
            let raw = max * percent / 100.0;
            Ok(ResolvedWeight {
                value: rounding.round(raw),
                unit: rounding.unit,
            })
        }
    }
}
