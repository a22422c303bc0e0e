//! Read-only views derived from a generated week.
//!
//! Nothing here changes a plan; these feed the CLI and the planner's logs.

use crate::types::{DayCategory, DayTypePerformance, Week};
use serde::Serialize;
use std::fmt;

/// Weeks beyond which a goal is reported as more than a year away
pub const YEAR_IN_WEEKS: u32 = 52;

/// Estimated time to reach a target max
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub weeks_needed: u32,
    pub weekly_growth_pct: f64,
    pub beyond_a_year: bool,
}

/// Weeks needed at a constant weekly growth rate
///
/// `None` when there is no target, it is already reached, or the growth rate
/// cannot make progress.
pub fn predict_target(current_max: u32, target: Option<u32>, weekly_growth: f64) -> Option<Prediction> {
    let target = target?;
    if current_max == 0 || target <= current_max || weekly_growth <= 1.0 {
        return None;
    }

    let ratio = target as f64 / current_max as f64;
    let weeks_needed = (ratio.ln() / weekly_growth.ln()).ceil() as u32;

    Some(Prediction {
        weeks_needed,
        weekly_growth_pct: ((weekly_growth - 1.0) * 100.0).round(),
        beyond_a_year: weeks_needed > YEAR_IN_WEEKS,
    })
}

/// Something the user should look at before training
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    CascadingFailures { weeks: u32 },
    PlateauDetected { message: String },
    PlateauWatch { message: String },
    CriticalFailure { completion_rate: f64 },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::CascadingFailures { weeks } => write!(
                f,
                "Cascading failures ({} weeks): the selector will switch strategy to break the cycle. Prioritize recovery.",
                weeks
            ),
            Alert::PlateauDetected { message } => write!(f, "Plateau detected: {}", message),
            Alert::PlateauWatch { message } => write!(f, "Watch: {}", message),
            Alert::CriticalFailure { completion_rate } => write!(
                f,
                "Critical failure: only {:.0}% of last week's volume completed. This week is scaled down.",
                completion_rate * 100.0
            ),
        }
    }
}

/// Alerts carried by a week, most urgent first
pub fn alerts(week: &Week) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if week.consecutive_failures >= 2 {
        alerts.push(Alert::CascadingFailures {
            weeks: week.consecutive_failures,
        });
    }

    if let Some(info) = &week.plateau_info {
        match (&info.suggestion, info.detected) {
            (Some(message), true) => alerts.push(Alert::PlateauDetected {
                message: message.clone(),
            }),
            (Some(message), false) => alerts.push(Alert::PlateauWatch {
                message: message.clone(),
            }),
            _ => {}
        }
    }

    if week.critical_failure {
        alerts.push(Alert::CriticalFailure {
            completion_rate: week.volume_completion_rate,
        });
    }

    alerts
}

/// How a canonical day type went last week
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayTypeStatus {
    TooHard,
    TooEasy,
    Adapted,
}

impl DayTypeStatus {
    pub fn from_performance(perf: &DayTypePerformance) -> Self {
        if perf.failure_rate > 0.30 {
            DayTypeStatus::TooHard
        } else if perf.easy_rate > 0.40 {
            DayTypeStatus::TooEasy
        } else {
            DayTypeStatus::Adapted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayTypeStatus::TooHard => "too hard",
            DayTypeStatus::TooEasy => "too easy",
            DayTypeStatus::Adapted => "adapted",
        }
    }
}

/// Status per day type that saw any training last week
pub fn day_type_status(week: &Week) -> Vec<(DayCategory, DayTypeStatus)> {
    week.day_type_performance
        .iter()
        .filter(|(_, perf)| perf.total > 0)
        .map(|(category, perf)| (*category, DayTypeStatus::from_performance(perf)))
        .collect()
}

/// Where an exercise stands after a week was generated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanState {
    FirstWeek,
    SteadyState,
    PlateauFlagged,
    CascadingFailure,
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanState::FirstWeek => "first week",
            PlanState::SteadyState => "steady state",
            PlanState::PlateauFlagged => "plateau flagged",
            PlanState::CascadingFailure => "cascading failure",
        };
        f.write_str(s)
    }
}

/// Derive the plan state; failure streaks outrank plateaus
pub fn plan_state(week: &Week) -> PlanState {
    if week.plateau_info.is_none() {
        PlanState::FirstWeek
    } else if week.consecutive_failures >= 2 {
        PlanState::CascadingFailure
    } else if week.plateau_info.as_ref().is_some_and(|p| p.detected) {
        PlanState::PlateauFlagged
    } else {
        PlanState::SteadyState
    }
}
