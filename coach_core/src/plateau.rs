//! Plateau detection over an exercise's max-rep history.

use crate::config::PlannerConfig;
use crate::types::{PlateauInfo, Week};

/// Flag multi-week stagnation of max reps for one exercise
///
/// Returns `None` when there is no previous week. The window scans at most
/// `lookback_weeks` of the newest weeks for the latest max-rep gain; when no
/// gain shows up in the window, the whole window counts as stagnant.
pub fn detect(
    previous_week: Option<&Week>,
    history: &[Week],
    exercise_type: &str,
    config: &PlannerConfig,
) -> Option<PlateauInfo> {
    let previous = previous_week?;
    let exercise = if exercise_type.is_empty() {
        previous.exercise_type.as_str()
    } else {
        exercise_type
    };

    let maxes: Vec<u32> = history
        .iter()
        .filter(|w| w.exercise_type == exercise)
        .map(|w| w.max_reps)
        .collect();

    let settings = &config.plateau;
    if maxes.len() < settings.min_history_weeks {
        return Some(PlateauInfo::default());
    }

    let weeks_since_gain = weeks_since_gain(&maxes, settings.lookback_weeks);

    let suggestion = if weeks_since_gain >= settings.detect_after_weeks {
        Some(format!(
            "No max-rep gain for {} weeks. Vary the training or take a deload week; \
             the selector will favor a different strategy to break the plateau.",
            weeks_since_gain
        ))
    } else if weeks_since_gain == settings.watch_after_weeks {
        Some(format!(
            "Max reps flat for {} weeks. If it continues the selector will switch strategy.",
            weeks_since_gain
        ))
    } else {
        None
    };

    let detected = weeks_since_gain >= settings.detect_after_weeks;
    if detected {
        tracing::info!("Plateau detected for {}: {} weeks without gain", exercise, weeks_since_gain);
    }

    Some(PlateauInfo {
        detected,
        weeks_since_gain,
        suggestion,
    })
}

/// Weeks elapsed since the newest transition that raised max reps
fn weeks_since_gain(maxes: &[u32], lookback: usize) -> u32 {
    let len = maxes.len();
    let lowest = len.saturating_sub(lookback.max(1)).max(1);

    for i in (lowest..len).rev() {
        if maxes[i] > maxes[i - 1] {
            return (len - i - 1) as u32;
        }
    }

    (len - lowest) as u32
}
