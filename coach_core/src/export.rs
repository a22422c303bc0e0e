//! CSV export of planned programs, one row per prescribed day.

use crate::{Day, Result, Week};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    week: u32,
    exercise: &'a str,
    date: String,
    algorithm: &'static str,
    max_reps: u32,
    day: u32,
    calendar_day: Option<u32>,
    session: Option<&'static str>,
    day_type: &'a str,
    category: &'static str,
    sets: u32,
    reps: u32,
    rest: u32,
    intensity: u32,
    feedback: Option<&'static str>,
    actual_sets: Option<u32>,
    actual_last_reps: Option<u32>,
    split_applied: bool,
}

impl<'a> CsvRow<'a> {
    fn new(week: &'a Week, day: &'a Day) -> Self {
        CsvRow {
            week: week.week_number,
            exercise: &week.exercise_type,
            date: week.date.to_rfc3339(),
            algorithm: week.algo_id.as_str(),
            max_reps: week.max_reps,
            day: day.day,
            calendar_day: day.calendar_day,
            session: day.session.map(|s| match s {
                crate::Session::Morning => "morning",
                crate::Session::Evening => "evening",
            }),
            day_type: &day.day_type,
            category: day.category().as_str(),
            sets: day.sets,
            reps: day.reps,
            rest: day.rest,
            intensity: day.intensity,
            feedback: day.feedback.map(|f| f.as_str()),
            actual_sets: day.actual_sets,
            actual_last_reps: day.actual_last_reps,
            split_applied: day.split_applied,
        }
    }
}

/// Write every day of every week to a fresh CSV file; returns the row count
pub fn write_program_csv(weeks: &[Week], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(file);

    let mut rows = 0;
    for week in weeks {
        for day in &week.program {
            writer.serialize(CsvRow::new(week, day))?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} program rows to {:?}", rows, path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Feedback, Week};

    #[test]
    fn test_csv_has_header_and_one_row_per_day() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out/program.csv");

        let mut day = Day::training(2, "High Density", 13, 8, 15);
        day.feedback = Some(Feedback::TooHard);
        day.actual_sets = Some(9);
        let week = Week::new(1, "pushups", 20, vec![Day::test(20), day]);

        let rows = write_program_csv(&[week], &path).unwrap();
        assert_eq!(rows, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "week");
        assert!(headers.iter().any(|h| h == "split_applied"));

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        let category = headers.iter().position(|h| h == "category").unwrap();
        let feedback = headers.iter().position(|h| h == "feedback").unwrap();
        assert_eq!(&records[1][category], "Intense");
        assert_eq!(&records[1][feedback], "too-hard");
        assert_eq!(&records[0][feedback], "");
    }
}
