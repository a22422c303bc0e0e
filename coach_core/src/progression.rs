//! Week-over-week progression analysis.
//!
//! Turns the previous week's completion data and feedback into:
//! - a progression factor for the coming week
//! - per-day-type feedback counts
//! - volume completion, critical failure and failure streak diagnostics
//!
//! Everything here is a pure function of its arguments; history is always
//! handed in by the caller.

use crate::config::PlannerConfig;
use crate::types::{AdaptationMetrics, DayCategory, DayTypePerformance, Feedback, Week};
use crate::Day;
use std::collections::BTreeMap;

/// Outcome of analyzing the previous week
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionResult {
    pub factor: f64,
    /// `None` only when there is no previous week
    pub dominant_feedback: Option<Feedback>,
    pub volume_completion_rate: f64,
    pub day_type_performance: BTreeMap<DayCategory, DayTypePerformance>,
    pub adaptation_metrics: Option<AdaptationMetrics>,
    pub consecutive_failures: u32,
    pub critical_failure: bool,
}

impl ProgressionResult {
    /// Result for the first week of an exercise
    pub fn neutral() -> Self {
        Self {
            factor: 1.0,
            dominant_feedback: None,
            volume_completion_rate: 1.0,
            day_type_performance: BTreeMap::new(),
            adaptation_metrics: None,
            consecutive_failures: 0,
            critical_failure: false,
        }
    }
}

/// Analyze the previous week against the newly tested max
///
/// `history` is the full stored history (any exercise); only weeks of the
/// previous week's exercise type count towards the failure streak.
pub fn analyze(
    current_max: u32,
    previous_week: Option<&Week>,
    history: &[Week],
    config: &PlannerConfig,
) -> ProgressionResult {
    let Some(prev) = previous_week else {
        return ProgressionResult::neutral();
    };

    let mut planned_volume = 0.0;
    let mut actual_volume = 0.0;
    let mut feedbacks = Vec::new();
    let mut performance: BTreeMap<DayCategory, DayTypePerformance> = DayCategory::ALL
        .into_iter()
        .map(|c| (c, DayTypePerformance::default()))
        .collect();

    for day in prev.training_days() {
        let planned = day.sets as f64 * day.reps as f64;
        planned_volume += planned;

        let perf = performance.entry(day.category()).or_default();
        perf.total += 1;

        match day.recognized_feedback() {
            Some(Feedback::TooHard) => {
                actual_volume += match day.actual_sets {
                    Some(sets) => {
                        sets as f64 * day.reps as f64 + day.actual_last_reps.unwrap_or(0) as f64
                    }
                    None => planned * config.progression.legacy_failure_completion,
                };
                perf.failure += 1;
                feedbacks.push(Feedback::TooHard);
            }
            Some(fb) => {
                actual_volume += planned;
                match fb {
                    Feedback::TooEasy => perf.easy += 1,
                    Feedback::Perfect => perf.perfect += 1,
                    Feedback::DifficultFinished => perf.hard += 1,
                    Feedback::TooHard | Feedback::Unrecognized => {}
                }
                feedbacks.push(fb);
            }
            None => actual_volume += planned,
        }
    }

    for perf in performance.values_mut() {
        perf.finalize();
    }

    let volume_completion_rate = if planned_volume > 0.0 {
        actual_volume / planned_volume
    } else {
        1.0
    };

    let dominant = dominant_feedback(&feedbacks);
    let delta = if prev.max_reps > 0 {
        (current_max as f64 - prev.max_reps as f64) / prev.max_reps as f64
    } else {
        0.0
    };

    let factor = progression_factor(dominant, delta, volume_completion_rate, config);
    let critical_failure = volume_completion_rate < config.progression.critical_failure_threshold;
    let consecutive_failures = count_consecutive_failures(history, &prev.exercise_type);

    tracing::debug!(
        "Progression: delta {:+.3}, completion {:.2}, dominant {}, factor {:.3}",
        delta,
        volume_completion_rate,
        dominant,
        factor
    );

    ProgressionResult {
        factor,
        dominant_feedback: Some(dominant),
        volume_completion_rate,
        day_type_performance: performance,
        adaptation_metrics: Some(AdaptationMetrics {
            delta,
            feedback_count: feedbacks.len() as u32,
        }),
        consecutive_failures,
        critical_failure,
    }
}

/// Pick the representative feedback by priority, not majority
///
/// Any too-hard wins; otherwise difficult-finished or too-easy need a strict
/// majority; everything else reads as perfect.
pub fn dominant_feedback(feedbacks: &[Feedback]) -> Feedback {
    let total = feedbacks.len();
    let count = |kind: Feedback| feedbacks.iter().filter(|f| **f == kind).count();

    if feedbacks.contains(&Feedback::TooHard) {
        Feedback::TooHard
    } else if count(Feedback::DifficultFinished) * 2 > total {
        Feedback::DifficultFinished
    } else if count(Feedback::TooEasy) * 2 > total {
        Feedback::TooEasy
    } else {
        Feedback::Perfect
    }
}

fn progression_factor(
    dominant: Feedback,
    delta: f64,
    volume_completion_rate: f64,
    config: &PlannerConfig,
) -> f64 {
    let easy = dominant == Feedback::TooEasy;

    if dominant == Feedback::TooHard {
        (volume_completion_rate * 0.95).max(config.progression.failure_factor_floor)
    } else if delta > 0.10 {
        if easy {
            1.15
        } else {
            1.10
        }
    } else if delta > 0.03 {
        1.05
    } else if delta > -0.03 {
        if easy {
            1.08
        } else {
            1.0
        }
    } else {
        0.85
    }
}

/// Completion rate of a single too-hard day with recorded partial work
///
/// `None` unless the day failed and the completed sets were captured.
pub fn day_completion_rate(day: &Day) -> Option<f64> {
    if day.recognized_feedback() != Some(Feedback::TooHard) {
        return None;
    }
    let sets = day.actual_sets?;
    let planned = day.sets as f64 * day.reps as f64;
    if planned == 0.0 {
        return None;
    }
    let actual = sets as f64 * day.reps as f64 + day.actual_last_reps.unwrap_or(0) as f64;
    Some(actual / planned)
}

/// Count the most recent weeks of an exercise that contained a failure
///
/// Walks newest first and stops at the first clean week.
pub fn count_consecutive_failures(history: &[Week], exercise_type: &str) -> u32 {
    history
        .iter()
        .rev()
        .filter(|w| w.exercise_type == exercise_type)
        .take_while(|w| w.has_failure())
        .count() as u32
}
