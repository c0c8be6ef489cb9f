//! Logged workout history as a source of estimated maxes.
//!
//! History is a CSV export of logged sets with the columns
//! `date,exercise,category,weight,weight_unit,reps,comment`. Completed
//! sessions are appended to the same file in that format.

use crate::config::LiftsConfig;
use crate::progression::best_estimate;
use crate::{Lift, Maxes, Reps, Result, WeightUnit};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Number of most recent sets considered per lift
pub const RECENT_SETS: usize = 10;

/// CSV row format for logged sets (other columns are ignored)
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    exercise: String,
    weight: Option<f64>,
    weight_unit: Option<String>,
    reps: Option<String>,
}

/// A logged set with weight and reps
#[derive(Clone, Debug, PartialEq)]
pub struct LoggedSet {
    pub date: NaiveDate,
    pub exercise: String,
    pub weight: f64,
    /// `None` when the row left the unit blank
    pub weight_unit: Option<WeightUnit>,
    pub reps: Reps,
}

/// One history row as written when a session is completed
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub exercise: String,
    pub category: String,
    pub weight: Option<f64>,
    pub weight_unit: WeightUnit,
    pub reps: Reps,
    pub comment: Option<String>,
}

impl TryFrom<CsvRow> for LoggedSet {
    type Error = String;

    fn try_from(row: CsvRow) -> std::result::Result<Self, String> {
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{}': {}", row.date, e))?;
        let weight = row.weight.ok_or("missing weight")?;
        let weight_unit = row
            .weight_unit
            .filter(|unit| !unit.is_empty())
            .map(|unit| unit.parse::<WeightUnit>())
            .transpose()?;
        let reps = row.reps.ok_or("missing reps")?.parse::<Reps>()?;

        Ok(LoggedSet {
            date,
            exercise: row.exercise.trim().to_string(),
            weight,
            weight_unit,
            reps,
        })
    }
}

/// Load logged sets from a CSV file.
///
/// Rows without a usable date, weight or reps (cardio, bodyweight notes)
/// are skipped.
pub fn load_logged_sets(path: &Path) -> Result<Vec<LoggedSet>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut sets = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping history row {}: {}", idx + 2, e);
                continue;
            }
        };

        match LoggedSet::try_from(row) {
            Ok(set) => sets.push(set),
            Err(reason) => tracing::debug!("Skipping history row {}: {}", idx + 2, reason),
        }
    }

    tracing::debug!("Loaded {} logged sets from {:?}", sets.len(), path);
    Ok(sets)
}

/// Append completed sets to a history file, creating it with a header.
///
/// The file is held under an exclusive lock while rows are written.
/// Returns the number of rows appended.
pub fn append_history(path: &Path, entries: &[HistoryEntry]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;
    let written = write_entries(&file, entries);
    file.unlock()?;
    written?;

    tracing::info!("Appended {} rows to history {:?}", entries.len(), path);
    Ok(entries.len())
}

fn write_entries(file: &File, entries: &[HistoryEntry]) -> Result<()> {
    let needs_header = file.metadata()?.len() == 0;
    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    drop(writer);
    file.sync_all()?;
    Ok(())
}

/// Estimate each lift's max from its most recent logged sets.
///
/// Sets logged in a unit other than `unit` are skipped, since weights are
/// never converted. Sets with no unit are taken to be in `unit`.
pub fn estimate_maxes(sets: &[LoggedSet], lifts: &LiftsConfig, unit: WeightUnit) -> Maxes {
    let mut maxes = Maxes::default();

    for lift in Lift::ALL {
        let exercise = lifts.exercise_for(lift);
        let (mut logged, other_unit): (Vec<&LoggedSet>, Vec<&LoggedSet>) = sets
            .iter()
            .filter(|s| s.exercise.eq_ignore_ascii_case(exercise))
            .partition(|s| s.weight_unit.map_or(true, |u| u == unit));
        if !other_unit.is_empty() {
            tracing::warn!(
                "Ignoring {} {} sets not logged in {}",
                other_unit.len(),
                exercise,
                unit
            );
        }
        logged.sort_by_key(|s| s.date);

        let recent = logged.iter().rev().take(RECENT_SETS);
        let estimate = best_estimate(recent.map(|s| (s.weight, &s.reps)));
        if let Some(value) = estimate {
            tracing::info!("Estimated {} max from history: {}", lift, value);
        }
        maxes.set(lift, estimate);
    }

    maxes
}
