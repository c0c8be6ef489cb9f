//! One-rep-max estimation from logged sets.
//!
//! Uses the Epley formula: `weight * (1 + reps / 30)`. AMRAP and range reps
//! are estimated from their numeric floor, since the reps actually
//! performed are only known once the set is logged.

use crate::Reps;

/// Epley estimate rounded to 0.1
///
/// Returns `None` for non-positive or non-finite weights.
pub fn estimate_one_rep_max(weight: f64, reps: &Reps) -> Option<f64> {
    if !weight.is_finite() || weight <= 0.0 {
        return None;
    }

    let reps = reps.floor() as f64;
    let estimate = weight * (1.0 + reps / 30.0);
    Some((estimate * 10.0).round() / 10.0)
}

/// Best estimate across a series of `(weight, reps)` sets.
pub fn best_estimate<'a, I>(sets: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, &'a Reps)>,
{
    best_by_estimate(sets, |set| *set).map(|(_, estimate)| estimate)
}

/// The item whose `(weight, reps)` gives the highest estimate, with it.
///
/// Ties keep the earliest item.
pub fn best_by_estimate<'a, T, I, F>(items: I, set_of: F) -> Option<(T, f64)>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> (f64, &'a Reps),
{
    items
        .into_iter()
        .filter_map(|item| {
            let (weight, reps) = set_of(&item);
            estimate_one_rep_max(weight, reps).map(|e| (item, e))
        })
        .fold(None, |best, (item, e)| match best {
            Some((_, b)) if b >= e => best,
            _ => Some((item, e)),
        })
}
