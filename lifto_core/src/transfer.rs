//! Completing an upcoming session: move its rows into logged history.

use crate::history::{append_history, HistoryEntry};
use crate::store::UpcomingStore;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Outcome of completing a session
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TransferResult {
    pub session: u32,
    pub date: NaiveDate,
    pub count: usize,
    pub message: String,
}

/// Log every row of `session` on `date`, then drop it from the queue.
///
/// Rows keep their queue order in the history file. History is written
/// before the queue changes, so a failed append leaves the session queued.
pub fn complete_session<S: UpcomingStore + ?Sized>(
    store: &mut S,
    session: u32,
    date: NaiveDate,
    history: &Path,
) -> Result<TransferResult> {
    let rows = store.by_session(session)?;
    if rows.is_empty() {
        return Err(Error::SessionNotFound(session));
    }

    let entries: Vec<HistoryEntry> = rows
        .into_iter()
        .map(|row| HistoryEntry {
            date,
            exercise: row.workout.exercise,
            category: row.workout.category,
            weight: row.workout.weight,
            weight_unit: row.workout.weight_unit,
            reps: row.workout.reps,
            comment: row.workout.comment,
        })
        .collect();

    append_history(history, &entries)?;
    let count = store.delete_session(session)?;

    tracing::info!("Completed session {} on {} ({} sets)", session, date, count);
    Ok(TransferResult {
        session,
        date,
        count,
        message: format!("Transferred {} workouts to {}", count, date),
    })
}
