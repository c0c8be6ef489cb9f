//! CSV export of the upcoming workout queue.

use crate::store::StoredWorkout;
use crate::Result;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    session: u32,
    exercise: String,
    category: String,
    weight: Option<f64>,
    weight_unit: String,
    reps: String,
    comment: Option<String>,
    id: String,
    created_at: String,
}

impl From<&StoredWorkout> for CsvRow {
    fn from(row: &StoredWorkout) -> Self {
        let w = &row.workout;
        CsvRow {
            session: w.session,
            exercise: w.exercise.clone(),
            category: w.category.clone(),
            weight: w.weight,
            weight_unit: w.weight_unit.to_string(),
            reps: w.reps.to_string(),
            comment: w.comment.clone(),
            id: row.id.to_string(),
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

/// Write the queue to `path`, replacing any existing file.
///
/// Returns the number of rows written.
pub fn export_csv(rows: &[StoredWorkout], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} upcoming workouts to {:?}", rows.len(), path);
    Ok(rows.len())
}
