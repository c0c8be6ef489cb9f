//! Progression view for one exercise: logged history plus the projected queue.

use crate::history::LoggedSet;
use crate::progression::best_by_estimate;
use crate::store::StoredWorkout;
use crate::{Reps, WeightUnit};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Days between projected sessions
pub const SESSION_SPACING_DAYS: u64 = 2;

/// Best logged set on one date
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub weight: f64,
    pub weight_unit: Option<WeightUnit>,
    pub reps: Reps,
    pub estimated_1rm: f64,
}

/// Best queued set in one session, with the date it is expected to happen
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProjectedPoint {
    pub session: u32,
    pub projected_date: NaiveDate,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub reps: Reps,
    pub estimated_1rm: f64,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressionReport {
    pub exercise: String,
    pub historical: Vec<HistoricalPoint>,
    pub upcoming: Vec<ProjectedPoint>,
}

/// Build the progression view for `exercise` (matched case-insensitively).
///
/// Every queued session gets a date, two days apart, starting two days
/// after the last logged date (or `today` with no history). Sessions that
/// do not include the exercise still use up their date.
pub fn progression_report(
    exercise: &str,
    logged: &[LoggedSet],
    upcoming: &[StoredWorkout],
    today: NaiveDate,
) -> ProgressionReport {
    let mut by_date: BTreeMap<NaiveDate, Vec<&LoggedSet>> = BTreeMap::new();
    for set in logged
        .iter()
        .filter(|s| s.exercise.eq_ignore_ascii_case(exercise))
    {
        by_date.entry(set.date).or_default().push(set);
    }

    let historical: Vec<HistoricalPoint> = by_date
        .into_iter()
        .filter_map(|(date, sets)| {
            let (best, estimated_1rm) = best_by_estimate(sets, |s| (s.weight, &s.reps))?;
            Some(HistoricalPoint {
                date,
                weight: best.weight,
                weight_unit: best.weight_unit,
                reps: best.reps.clone(),
                estimated_1rm,
            })
        })
        .collect();

    let start = match historical.last() {
        Some(point) => point.date + Days::new(SESSION_SPACING_DAYS),
        None => today,
    };

    let mut sessions: BTreeMap<u32, Vec<&StoredWorkout>> = BTreeMap::new();
    for row in upcoming {
        sessions.entry(row.workout.session).or_default().push(row);
    }

    let mut projected = Vec::new();
    let mut date = start;
    for (session, rows) in sessions {
        let candidates = rows.into_iter().filter_map(|row| {
            let w = &row.workout;
            match w.weight {
                Some(weight) if w.exercise.eq_ignore_ascii_case(exercise) => Some((weight, w)),
                _ => None,
            }
        });

        if let Some(((weight, best), estimated_1rm)) =
            best_by_estimate(candidates, |(weight, w)| (*weight, &w.reps))
        {
            projected.push(ProjectedPoint {
                session,
                projected_date: date,
                weight,
                weight_unit: best.weight_unit,
                reps: best.reps.clone(),
                estimated_1rm,
                comment: best.comment.clone(),
            });
        }
        date = date + Days::new(SESSION_SPACING_DAYS);
    }

    tracing::debug!(
        "Progression for {}: {} logged dates, {} projected sessions",
        exercise,
        historical.len(),
        projected.len()
    );

    ProgressionReport {
        exercise: exercise.to_string(),
        historical,
        upcoming: projected,
    }
}
