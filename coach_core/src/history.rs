//! Training history persistence with file locking.
//!
//! All generated weeks live in one JSON document under the data directory.
//! The planner itself never touches this; the CLI loads a snapshot, hands it
//! to the planner and appends the result.

use crate::{Error, Feedback, Result, Week};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

/// File name of the history document inside the data directory
pub const HISTORY_FILE: &str = "history.json";

/// Persisted history document
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Every week of every exercise, oldest first
    #[serde(default)]
    pub weeks: Vec<Week>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for HistoryDocument {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            last_updated: None,
            weeks: Vec::new(),
        }
    }
}

impl HistoryDocument {
    /// Weeks of one exercise, oldest first
    pub fn weeks_for<'a>(&'a self, exercise_type: &'a str) -> impl Iterator<Item = &'a Week> + 'a {
        self.weeks.iter().filter(move |w| w.exercise_type == exercise_type)
    }

    /// Most recently stored week of an exercise
    pub fn latest_for(&self, exercise_type: &str) -> Option<&Week> {
        self.weeks.iter().rev().find(|w| w.exercise_type == exercise_type)
    }

    pub fn next_week_number(&self, exercise_type: &str) -> u32 {
        self.weeks_for(exercise_type)
            .map(|w| w.week_number)
            .max()
            .map_or(1, |n| n.saturating_add(1))
    }

    /// Distinct exercise types in order of first appearance
    pub fn exercises(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for week in &self.weeks {
            if !seen.contains(&week.exercise_type.as_str()) {
                seen.push(&week.exercise_type);
            }
        }
        seen
    }

    /// Record feedback on one day of the latest week of an exercise
    ///
    /// Partial-completion fields are kept only for too-hard days.
    pub fn record_feedback(
        &mut self,
        exercise_type: &str,
        day: u32,
        feedback: Feedback,
        actual_sets: Option<u32>,
        actual_last_reps: Option<u32>,
    ) -> Result<&Week> {
        let index = self
            .weeks
            .iter()
            .rposition(|w| w.exercise_type == exercise_type)
            .ok_or_else(|| Error::History(format!("No week planned yet for '{}'", exercise_type)))?;

        let week = &mut self.weeks[index];
        let week_number = week.week_number;
        let target = week
            .day_mut(day)
            .ok_or_else(|| Error::History(format!("Week {} has no day {}", week_number, day)))?;

        if target.is_test() {
            return Err(Error::History(
                "Day 1 is the test day; record your new max with `plan` instead".to_string(),
            ));
        }

        if feedback == Feedback::TooHard {
            if let Some(sets) = actual_sets {
                if sets > target.sets {
                    return Err(Error::History(format!(
                        "Completed sets ({}) exceed the {} planned",
                        sets, target.sets
                    )));
                }
            }
            target.actual_sets = actual_sets;
            target.actual_last_reps = actual_last_reps;
        } else {
            target.actual_sets = None;
            target.actual_last_reps = None;
        }
        target.feedback = Some(feedback);

        tracing::info!(
            "Recorded {} on day {} of week {} ({})",
            feedback,
            day,
            week_number,
            exercise_type
        );
        Ok(&self.weeks[index])
    }

    /// Reject documents the planner could not work with
    pub fn validate(&self) -> Result<()> {
        for (i, week) in self.weeks.iter().enumerate() {
            if week.exercise_type.trim().is_empty() {
                return Err(Error::Import(format!("Week #{} has no exercise type", i + 1)));
            }
            if week.program.is_empty() {
                return Err(Error::Import(format!(
                    "Week {} of {} has an empty program",
                    week.week_number, week.exercise_type
                )));
            }
            if week.max_reps == 0 {
                return Err(Error::Import(format!(
                    "Week {} of {} has max reps of 0",
                    week.week_number, week.exercise_type
                )));
            }
        }
        Ok(())
    }
}

/// Accepted import shapes: a full document or a bare list of weeks
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportShape {
    Document(HistoryDocument),
    Weeks(Vec<Week>),
}

/// Locked, atomically written history file
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/history.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(HISTORY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history with shared locking
    ///
    /// Returns an empty document if the file doesn't exist. A file that
    /// cannot be parsed is renamed to `history.json.corrupt-<timestamp>`
    /// next to the original before an empty document is returned, so a
    /// later save never overwrites it.
    pub fn load(&self) -> Result<HistoryDocument> {
        let path = &self.path;
        if !path.exists() {
            tracing::info!("No history file found, starting fresh");
            return Ok(HistoryDocument::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = Vec::new();
        let read = std::io::BufReader::new(&file).read_to_end(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_slice::<HistoryDocument>(&contents) {
            Ok(doc) => {
                if doc.schema_version > SCHEMA_VERSION {
                    tracing::warn!(
                        "History file {:?} has schema version {} (newer than {}); reading what we can",
                        path,
                        doc.schema_version,
                        SCHEMA_VERSION
                    );
                }
                tracing::debug!("Loaded {} weeks from {:?}", doc.weeks.len(), path);
                Ok(doc)
            }
            Err(e) => {
                let backup = self.set_aside()?;
                tracing::warn!(
                    "Failed to parse history file {:?}: {}. Moved it to {:?} and starting fresh.",
                    path,
                    e,
                    backup
                );
                Ok(HistoryDocument::default())
            }
        }
    }

    /// Rename the current history file out of the way; returns the new path
    fn set_aside(&self) -> Result<PathBuf> {
        let name = self
            .path
            .file_name()
            .map_or_else(|| HISTORY_FILE.to_string(), |n| n.to_string_lossy().into_owned());
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3fZ");
        let mut backup = self.path.with_file_name(format!("{}.corrupt-{}", name, stamp));
        let mut attempt = 1;
        while backup.exists() {
            backup = self.path.with_file_name(format!("{}.corrupt-{}-{}", name, stamp, attempt));
            attempt += 1;
        }
        std::fs::rename(&self.path, &backup)?;
        Ok(backup)
    }

    /// Save the history with exclusive locking
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames it
    /// over the original.
    pub fn save(&self, doc: &mut HistoryDocument) -> Result<()> {
        doc.schema_version = SCHEMA_VERSION;
        doc.last_updated = Some(Utc::now());
        write_atomic(&self.path, &serde_json::to_string(doc)?)?;
        tracing::debug!("Saved {} weeks to {:?}", doc.weeks.len(), self.path);
        Ok(())
    }

    /// Load, modify and save back
    pub fn update<F>(&self, f: F) -> Result<HistoryDocument>
    where
        F: FnOnce(&mut HistoryDocument) -> Result<()>,
    {
        let mut doc = self.load()?;
        f(&mut doc)?;
        self.save(&mut doc)?;
        Ok(doc)
    }

    pub fn append_week(&self, week: Week) -> Result<()> {
        self.update(|doc| {
            doc.weeks.push(week);
            Ok(())
        })?;
        Ok(())
    }

    /// Record feedback and persist; returns the updated week
    pub fn record_feedback(
        &self,
        exercise_type: &str,
        day: u32,
        feedback: Feedback,
        actual_sets: Option<u32>,
        actual_last_reps: Option<u32>,
    ) -> Result<Week> {
        let mut updated = None;
        self.update(|doc| {
            let week = doc.record_feedback(exercise_type, day, feedback, actual_sets, actual_last_reps)?;
            updated = Some(week.clone());
            Ok(())
        })?;
        updated.ok_or_else(|| Error::Other("feedback was not recorded".to_string()))
    }

    /// Replace the history with a validated file; returns the number of weeks
    pub fn import_from(&self, source: &Path) -> Result<usize> {
        let contents = std::fs::read_to_string(source)?;
        let mut doc = match serde_json::from_str::<ImportShape>(&contents)
            .map_err(|e| Error::Import(format!("{:?} is not a history file: {}", source, e)))?
        {
            ImportShape::Document(doc) => doc,
            ImportShape::Weeks(weeks) => HistoryDocument {
                weeks,
                ..HistoryDocument::default()
            },
        };
        doc.validate()?;

        let count = doc.weeks.len();
        self.save(&mut doc)?;
        tracing::info!("Imported {} weeks from {:?}", count, source);
        Ok(count)
    }

    /// Write the current history as pretty JSON
    pub fn export_to(&self, destination: &Path) -> Result<usize> {
        let doc = self.load()?;
        write_atomic(destination, &serde_json::to_string_pretty(&doc)?)?;
        tracing::info!("Exported {} weeks to {:?}", doc.weeks.len(), destination);
        Ok(doc.weeks.len())
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    // Same directory so the rename stays atomic
    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
