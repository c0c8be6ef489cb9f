//! Upcoming workout persistence.
//!
//! Generation only ever replaces the whole queue, so stores expose an
//! atomic `replace_all`. The file store rewrites its JSON through a temp
//! file and rename, holding an exclusive lock on a sidecar lock file for
//! the whole read-modify-write.

use crate::{Error, Result, UpcomingWorkout};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// A stored upcoming workout with its metadata
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredWorkout {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub workout: UpcomingWorkout,
}

impl StoredWorkout {
    fn stamp(workout: &UpcomingWorkout, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            workout: workout.clone(),
        }
    }
}

/// Persistence collaborator for the upcoming workout queue
pub trait UpcomingStore {
    /// All rows, ordered by session
    fn all(&self) -> Result<Vec<StoredWorkout>>;

    /// Atomically delete every row and insert `records`.
    ///
    /// Returns the number of rows deleted.
    fn replace_all(&mut self, records: &[UpcomingWorkout]) -> Result<usize>;

    /// Remove one session, returning how many rows it had
    fn delete_session(&mut self, session: u32) -> Result<usize>;

    fn by_session(&self, session: u32) -> Result<Vec<StoredWorkout>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|row| row.workout.session == session)
            .collect())
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<StoredWorkout>,
}

impl UpcomingStore for MemoryStore {
    fn all(&self) -> Result<Vec<StoredWorkout>> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|row| row.workout.session);
        Ok(rows)
    }

    fn replace_all(&mut self, records: &[UpcomingWorkout]) -> Result<usize> {
        let now = Utc::now();
        let deleted = self.rows.len();
        self.rows = records.iter().map(|r| StoredWorkout::stamp(r, now)).collect();
        Ok(deleted)
    }

    fn delete_session(&mut self, session: u32) -> Result<usize> {
        let before = self.rows.len();
        self.rows.retain(|row| row.workout.session != session);
        Ok(before - self.rows.len())
    }
}

/// JSON file store used by the CLI
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent(&self) -> Result<&Path> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent),
            Some(_) => Ok(Path::new(".")),
            None => Err(Error::Store(format!(
                "store path {:?} has no parent directory",
                self.path
            ))),
        }
    }

    /// Open (creating) the sidecar lock file and take an exclusive lock.
    fn lock(&self) -> Result<File> {
        std::fs::create_dir_all(self.parent()?)?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    /// Read rows without taking the writer lock.
    ///
    /// A missing file is an empty queue. A corrupt file is logged and also
    /// treated as empty so that regeneration can recover from it.
    fn read_rows(&self) -> Result<Vec<StoredWorkout>> {
        if !self.path.exists() {
            tracing::debug!("No upcoming store at {:?}, treating as empty", self.path);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_str::<Vec<StoredWorkout>>(&contents) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse upcoming store {:?}: {}. Treating as empty.",
                    self.path,
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    fn write_rows(&self, rows: &[StoredWorkout]) -> Result<()> {
        let temp = NamedTempFile::new_in(self.parent()?)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, rows)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("Wrote {} upcoming rows to {:?}", rows.len(), self.path);
        Ok(())
    }
}

impl UpcomingStore for JsonFileStore {
    fn all(&self) -> Result<Vec<StoredWorkout>> {
        let mut rows = self.read_rows()?;
        rows.sort_by_key(|row| row.workout.session);
        Ok(rows)
    }

    fn replace_all(&mut self, records: &[UpcomingWorkout]) -> Result<usize> {
        let lock = self.lock()?;
        let deleted = self.read_rows()?.len();

        let now = Utc::now();
        let rows: Vec<_> = records.iter().map(|r| StoredWorkout::stamp(r, now)).collect();
        let written = self.write_rows(&rows);

        lock.unlock()?;
        written?;
        Ok(deleted)
    }

    fn delete_session(&mut self, session: u32) -> Result<usize> {
        let lock = self.lock()?;
        let mut rows = self.read_rows()?;
        let before = rows.len();
        rows.retain(|row| row.workout.session != session);
        let removed = before - rows.len();

        let written = if removed > 0 {
            self.write_rows(&rows)
        } else {
            Ok(())
        };

        lock.unlock()?;
        written?;
        Ok(removed)
    }
}
