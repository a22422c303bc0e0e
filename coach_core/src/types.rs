//! Core domain types for the progression planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - Algorithm identifiers and subjective feedback values
//! - Prescribed days and generated weeks
//! - Diagnostics carried on a week (per-type performance, plateau info)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use crate::day_type::DayCategory;

// ============================================================================
// Algorithm Identity
// ============================================================================

/// Identifier of one of the five training strategies
///
/// Declaration order is catalog order, which is also the selector's
/// tie-break order.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum AlgorithmId {
    #[serde(rename = "GTG")]
    Gtg,
    #[serde(rename = "RUSSIAN_FIGHTER")]
    RussianFighter,
    #[serde(rename = "ARMSTRONG")]
    Armstrong,
    #[serde(rename = "DENSITY")]
    Density,
    #[serde(rename = "WAVE_531")]
    Wave531,
    /// Any id from stale or foreign history; never selected, never scored
    #[default]
    #[serde(other, rename = "UNKNOWN")]
    Unknown,
}

impl AlgorithmId {
    /// All selectable strategies, in catalog order
    pub const ALL: [AlgorithmId; 5] = [
        AlgorithmId::Gtg,
        AlgorithmId::RussianFighter,
        AlgorithmId::Armstrong,
        AlgorithmId::Density,
        AlgorithmId::Wave531,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::Gtg => "GTG",
            AlgorithmId::RussianFighter => "RUSSIAN_FIGHTER",
            AlgorithmId::Armstrong => "ARMSTRONG",
            AlgorithmId::Density => "DENSITY",
            AlgorithmId::Wave531 => "WAVE_531",
            AlgorithmId::Unknown => "UNKNOWN",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AlgorithmId::Unknown)
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        AlgorithmId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| format!("Unknown algorithm: {}", s))
    }
}

/// Per-strategy selection scores, ordered by catalog order
pub type AlgorithmScores = BTreeMap<AlgorithmId, f64>;

// ============================================================================
// Feedback
// ============================================================================

/// Subjective outcome recorded by the user after a training day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Feedback {
    #[serde(rename = "too-easy")]
    TooEasy,
    #[serde(rename = "perfect")]
    Perfect,
    #[serde(rename = "difficult-finished")]
    DifficultFinished,
    #[serde(rename = "too-hard")]
    TooHard,
    /// Any other stored value; treated as "no feedback" by analysis
    #[serde(other, rename = "unrecognized")]
    Unrecognized,
}

impl Feedback {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Feedback::Unrecognized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::TooEasy => "too-easy",
            Feedback::Perfect => "perfect",
            Feedback::DifficultFinished => "difficult-finished",
            Feedback::TooHard => "too-hard",
            Feedback::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "too-easy" | "easy" => Ok(Feedback::TooEasy),
            "perfect" => Ok(Feedback::Perfect),
            "difficult-finished" | "hard" => Ok(Feedback::DifficultFinished),
            "too-hard" | "failed" => Ok(Feedback::TooHard),
            other => Err(format!(
                "Unknown feedback '{}' (expected too-easy, perfect, difficult-finished or too-hard)",
                other
            )),
        }
    }
}

// ============================================================================
// Days
// ============================================================================

/// Time-of-day slot of a training session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Morning,
    Evening,
}

/// One prescribed training session within a week
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Day {
    /// Position within the week; 1 is the Test day
    pub day: u32,
    /// Free-form label, reducible to a [`DayCategory`]
    pub day_type: String,
    pub sets: u32,
    pub reps: u32,
    /// Seconds between sets
    pub rest: u32,
    /// Percent of max reps the prescription is sized from
    #[serde(default)]
    pub intensity: u32,
    /// Calendar day (2..=7) the session belongs to; absent on the Test day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    /// Per-set reps for ladder prescriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ladder: Option<Vec<u32>>,
    /// Length of a timed density block in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_minutes: Option<u32>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub feedback: Option<Feedback>,
    /// Fully completed sets, recorded on a too-hard day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_sets: Option<u32>,
    /// Reps managed in the set that failed, recorded on a too-hard day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_last_reps: Option<u32>,
    /// Sets/reps were rebalanced after a severe failure on this day type
    #[serde(default)]
    pub split_applied: bool,
}

impl Day {
    /// The calibration day that opens every week
    pub fn test(max_reps: u32) -> Self {
        Day {
            day: 1,
            day_type: "Test".into(),
            sets: 1,
            reps: max_reps,
            rest: 0,
            intensity: 100,
            calendar_day: None,
            session: None,
            ladder: None,
            block_minutes: None,
            explanation: "Reference test: one all-out set with strict form. \
                          This number calibrates every strategy, so be honest."
                .into(),
            feedback: None,
            actual_sets: None,
            actual_last_reps: None,
            split_applied: false,
        }
    }

    /// A training session with no feedback yet
    pub fn training(day: u32, day_type: impl Into<String>, sets: u32, reps: u32, rest: u32) -> Self {
        Day {
            day,
            day_type: day_type.into(),
            sets,
            reps,
            rest,
            intensity: 0,
            calendar_day: None,
            session: None,
            ladder: None,
            block_minutes: None,
            explanation: String::new(),
            feedback: None,
            actual_sets: None,
            actual_last_reps: None,
            split_applied: false,
        }
    }

    pub fn is_test(&self) -> bool {
        self.day == 1
    }

    /// Planned volume in reps (sets × reps), saturating at `u32::MAX`
    pub fn planned_volume(&self) -> u32 {
        self.sets.saturating_mul(self.reps)
    }

    /// Recognized feedback only; unrecognized values read as none
    pub fn recognized_feedback(&self) -> Option<Feedback> {
        self.feedback.filter(Feedback::is_recognized)
    }

    pub fn category(&self) -> DayCategory {
        DayCategory::from_label(&self.day_type)
    }
}

// ============================================================================
// Week diagnostics
// ============================================================================

/// Aggregated feedback counts for one canonical day type
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DayTypePerformance {
    pub total: u32,
    pub easy: u32,
    pub perfect: u32,
    pub hard: u32,
    pub failure: u32,
    pub failure_rate: f64,
    pub easy_rate: f64,
}

impl DayTypePerformance {
    /// Recompute the derived rates from the counters
    pub fn finalize(&mut self) {
        if self.total > 0 {
            self.failure_rate = self.failure as f64 / self.total as f64;
            self.easy_rate = self.easy as f64 / self.total as f64;
        }
    }
}

/// Multi-week stagnation diagnostic
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlateauInfo {
    pub detected: bool,
    pub weeks_since_gain: u32,
    pub suggestion: Option<String>,
}

/// Raw inputs behind the progression factor
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AdaptationMetrics {
    /// Relative change of max reps against the previous week
    pub delta: f64,
    /// Number of recognized feedback entries in the previous week
    pub feedback_count: u32,
}

/// Which branch of the selector produced the week's strategy
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    FirstWeek,
    Exploration,
    Exploitation,
}

// ============================================================================
// Week
// ============================================================================

/// One generated training week
///
/// Created once by the planner and only touched afterwards by the feedback
/// path (`feedback`, `actual_sets`, `actual_last_reps` on its days).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Week {
    pub week_number: u32,
    pub exercise_type: String,
    pub max_reps: u32,
    #[serde(default)]
    pub target_reps: Option<u32>,
    pub program: Vec<Day>,
    #[serde(default)]
    pub total_volume: u32,
    #[serde(default)]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub algo_id: AlgorithmId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_phase: Option<SelectionPhase>,
    #[serde(default)]
    pub selection_reason: String,
    #[serde(default)]
    pub algo_scores: AlgorithmScores,
    #[serde(default = "neutral_factor")]
    pub progression_factor: f64,
    #[serde(default)]
    pub advice: String,
    #[serde(default)]
    pub day_type_performance: BTreeMap<DayCategory, DayTypePerformance>,
    #[serde(default)]
    pub plateau_info: Option<PlateauInfo>,
    #[serde(default)]
    pub adaptation_metrics: Option<AdaptationMetrics>,
    #[serde(default = "neutral_factor")]
    pub volume_completion_rate: f64,
    #[serde(default)]
    pub critical_failure: bool,
    #[serde(default)]
    pub consecutive_failures: u32,
    #[serde(default)]
    pub split_applied: bool,
}

fn neutral_factor() -> f64 {
    1.0
}

impl Week {
    /// A bare week with neutral diagnostics, as found in imported history
    pub fn new(week_number: u32, exercise_type: impl Into<String>, max_reps: u32, program: Vec<Day>) -> Self {
        let mut week = Week {
            week_number,
            exercise_type: exercise_type.into(),
            max_reps,
            target_reps: None,
            program,
            total_volume: 0,
            date: DateTime::<Utc>::default(),
            algo_id: AlgorithmId::Unknown,
            selection_phase: None,
            selection_reason: String::new(),
            algo_scores: AlgorithmScores::new(),
            progression_factor: 1.0,
            advice: String::new(),
            day_type_performance: BTreeMap::new(),
            plateau_info: None,
            adaptation_metrics: None,
            volume_completion_rate: 1.0,
            critical_failure: false,
            consecutive_failures: 0,
            split_applied: false,
        };
        week.total_volume = week.compute_total_volume();
        week
    }

    /// Every day except the Test day
    pub fn training_days(&self) -> impl Iterator<Item = &Day> {
        self.program.iter().filter(|d| !d.is_test())
    }

    /// True if any day of the week was marked too-hard
    pub fn has_failure(&self) -> bool {
        self.program
            .iter()
            .any(|d| d.feedback == Some(Feedback::TooHard))
    }

    /// Sum of sets × reps over the whole program, saturating
    pub fn compute_total_volume(&self) -> u32 {
        self.program
            .iter()
            .fold(0u32, |total, d| total.saturating_add(d.planned_volume()))
    }

    pub fn day_mut(&mut self, day: u32) -> Option<&mut Day> {
        self.program.iter_mut().find(|d| d.day == day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_wire_values() {
        let parsed: Vec<Feedback> =
            serde_json::from_str(r#"["too-easy","perfect","difficult-finished","too-hard"]"#)
                .unwrap();
        assert_eq!(
            parsed,
            vec![
                Feedback::TooEasy,
                Feedback::Perfect,
                Feedback::DifficultFinished,
                Feedback::TooHard
            ]
        );
    }

    #[test]
    fn test_malformed_feedback_is_unrecognized() {
        let fb: Feedback = serde_json::from_str(r#""trop_difficile""#).unwrap();
        assert_eq!(fb, Feedback::Unrecognized);
        assert!(!fb.is_recognized());
    }

    #[test]
    fn test_unknown_algorithm_id_deserializes() {
        let id: AlgorithmId = serde_json::from_str(r#""LEGACY_PYRAMID""#).unwrap();
        assert_eq!(id, AlgorithmId::Unknown);
        assert!(!id.is_known());
    }

    #[test]
    fn test_algorithm_id_from_str() {
        assert_eq!("wave-531".parse::<AlgorithmId>().unwrap(), AlgorithmId::Wave531);
        assert_eq!("gtg".parse::<AlgorithmId>().unwrap(), AlgorithmId::Gtg);
        assert!("unknown".parse::<AlgorithmId>().is_err());
    }

    #[test]
    fn test_feedback_from_str_rejects_garbage() {
        assert_eq!("too_hard".parse::<Feedback>().unwrap(), Feedback::TooHard);
        assert!("meh".parse::<Feedback>().is_err());
    }

    #[test]
    fn test_scores_serialize_with_string_keys() {
        let mut scores = AlgorithmScores::new();
        scores.insert(AlgorithmId::Wave531, 1.5);
        scores.insert(AlgorithmId::Gtg, -0.5);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"GTG":-0.5,"WAVE_531":1.5}"#);
        let back: AlgorithmScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
    }
}
