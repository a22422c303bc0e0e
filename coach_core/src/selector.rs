//! Strategy selection from historical feedback.
//!
//! Three phases:
//! 1. **First week** of an exercise → Grease The Groove, to calibrate
//! 2. **Exploration** → the first strategy never tried yet
//! 3. **Exploitation** → best average score plus a recency bonus for
//!    strategies left idle for a while
//!
//! Scores are averages per feedback event while the bonuses are flat
//! additions; the two are combined linearly as-is.

use crate::catalog;
use crate::config::PlannerConfig;
use crate::types::{AlgorithmId, AlgorithmScores, Feedback, SelectionPhase, Week};
use std::collections::BTreeMap;

/// Strategy used when nothing else can be decided
pub const DEFAULT_ALGORITHM: AlgorithmId = AlgorithmId::Gtg;

/// Outcome of a selection round
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub algo_id: AlgorithmId,
    pub phase: SelectionPhase,
    pub rationale: String,
    /// Raw scores (without bonus); empty on the first week
    pub scores: AlgorithmScores,
}

/// Choose the strategy for the coming week
///
/// `history` must already be restricted to one exercise type, oldest first.
pub fn select(history: &[&Week], config: &PlannerConfig) -> Selection {
    if history.is_empty() {
        let name = catalog::display_name(DEFAULT_ALGORITHM);
        return Selection {
            algo_id: DEFAULT_ALGORITHM,
            phase: SelectionPhase::FirstWeek,
            rationale: format!(
                "First week: {} is the ideal way to calibrate your level and start progressing quickly.",
                name
            ),
            scores: AlgorithmScores::new(),
        };
    }

    let usage = usage_counts(history);
    let scores = compute_all_scores(history);

    if let Some(untested) = AlgorithmId::ALL.into_iter().find(|id| usage[id] == 0) {
        let descriptor = catalog::descriptor(untested);
        tracing::info!("Exploration phase: trying {}", untested);
        return Selection {
            algo_id: untested,
            phase: SelectionPhase::Exploration,
            rationale: format!(
                "Exploration phase: testing {} to discover your best method. {}",
                catalog::display_name(untested),
                descriptor.map(|d| d.description).unwrap_or_default()
            ),
            scores,
        };
    }

    let mut best = (DEFAULT_ALGORITHM, f64::NEG_INFINITY);
    for id in AlgorithmId::ALL {
        let total = scores.get(&id).copied().unwrap_or(0.0) + idle_bonus(history, id, config);
        tracing::debug!("Exploitation candidate {}: {:.2}", id, total);
        if total > best.1 {
            best = (id, total);
        }
    }

    let algo_id = best.0;
    let score = scores.get(&algo_id).copied().unwrap_or(0.0);
    tracing::info!("Exploitation phase: selected {} (score {:.2})", algo_id, score);

    Selection {
        algo_id,
        phase: SelectionPhase::Exploitation,
        rationale: exploitation_rationale(history, algo_id, score),
        scores,
    }
}

/// Number of recorded weeks per known strategy; unknown ids are ignored
pub fn usage_counts(history: &[&Week]) -> BTreeMap<AlgorithmId, usize> {
    let mut usage: BTreeMap<AlgorithmId, usize> =
        AlgorithmId::ALL.into_iter().map(|id| (id, 0)).collect();
    for week in history {
        match usage.get_mut(&week.algo_id) {
            Some(count) => *count += 1,
            None => tracing::warn!(
                "Week {} of {} has an unknown algorithm id, ignoring it for selection",
                week.week_number,
                week.exercise_type
            ),
        }
    }
    usage
}

/// Score every known strategy
pub fn compute_all_scores(history: &[&Week]) -> AlgorithmScores {
    AlgorithmId::ALL
        .into_iter()
        .map(|id| {
            let weeks: Vec<&Week> = history.iter().copied().filter(|w| w.algo_id == id).collect();
            (id, score(&weeks))
        })
        .collect()
}

/// Average points per feedback event over the weeks that used a strategy
///
/// Feedback: perfect +2, difficult-finished +1, too-easy -0.5, too-hard -2.
/// Between consecutive weeks of the strategy: max gain +3, max loss -1.
/// Returns 0 when there is no feedback to average over.
pub fn score(weeks_using_algo: &[&Week]) -> f64 {
    let mut total = 0.0;
    let mut data_points = 0usize;

    for (i, week) in weeks_using_algo.iter().enumerate() {
        for fb in week.training_days().filter_map(|d| d.recognized_feedback()) {
            data_points += 1;
            total += feedback_points(fb);
        }

        if i > 0 {
            let prev = weeks_using_algo[i - 1];
            if week.max_reps > prev.max_reps {
                total += 3.0;
            } else if week.max_reps < prev.max_reps {
                total -= 1.0;
            }
        }
    }

    if data_points > 0 {
        total / data_points as f64
    } else {
        0.0
    }
}

fn feedback_points(feedback: Feedback) -> f64 {
    match feedback {
        Feedback::Perfect => 2.0,
        Feedback::DifficultFinished => 1.0,
        Feedback::TooEasy => -0.5,
        Feedback::TooHard => -2.0,
        Feedback::Unrecognized => 0.0,
    }
}

/// Recency bonus: how long since the strategy was last used
pub fn idle_bonus(history: &[&Week], id: AlgorithmId, config: &PlannerConfig) -> f64 {
    let settings = &config.selection;
    match history.iter().rev().position(|w| w.algo_id == id) {
        Some(weeks_ago) if weeks_ago >= settings.long_idle_weeks => settings.long_idle_bonus,
        Some(weeks_ago) if weeks_ago >= settings.short_idle_weeks => settings.short_idle_bonus,
        _ => 0.0,
    }
}

/// Format a score the way the advice tables show it (`+1.5`, `-0.5`, `0.0`)
pub fn format_score(score: f64) -> String {
    if score > 0.0 {
        format!("+{:.1}", score)
    } else {
        format!("{:.1}", score)
    }
}

fn exploitation_rationale(history: &[&Week], algo_id: AlgorithmId, score: f64) -> String {
    let feedback_count: usize = history
        .iter()
        .filter(|w| w.algo_id == algo_id)
        .map(|w| w.training_days().filter(|d| d.recognized_feedback().is_some()).count())
        .sum();

    let mut reason = format!(
        "Automatic selection: {} scored best over your {} feedback entries (score: {}). ",
        catalog::display_name(algo_id),
        feedback_count,
        format_score(score)
    );

    if score > 3.0 {
        reason.push_str("Your feedback says this strategy is perfectly calibrated for you. ");
    } else if score > 1.0 {
        reason.push_str("This strategy produces good sessions according to your feedback. ");
    } else if score == 0.0 {
        reason.push_str("Still calibrating; keep rating your sessions. ");
    } else {
        reason.push_str("Mixed results, but currently the best available. Varied feedback will refine it. ");
    }

    if let Some(descriptor) = catalog::descriptor(algo_id) {
        reason.push_str(&format!("Best for: {}", descriptor.best_for));
    }

    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Day;

    fn week(number: u32, algo_id: AlgorithmId, max_reps: u32, feedback: &[Feedback]) -> Week {
        let mut program = vec![Day::test(max_reps)];
        for (i, fb) in feedback.iter().enumerate() {
            let mut day = Day::training(i as u32 + 2, "Moderate", 4, 8, 60);
            day.feedback = Some(*fb);
            program.push(day);
        }
        let mut w = Week::new(number, "pushups", max_reps, program);
        w.algo_id = algo_id;
        w
    }

    fn refs(history: &[Week]) -> Vec<&Week> {
        history.iter().collect()
    }

    #[test]
    fn test_first_week_selects_gtg() {
        let selection = select(&[], &PlannerConfig::default());
        assert_eq!(selection.algo_id, AlgorithmId::Gtg);
        assert_eq!(selection.phase, SelectionPhase::FirstWeek);
        assert!(selection.scores.is_empty());
    }

    #[test]
    fn test_exploration_picks_first_untested() {
        let history = vec![week(1, AlgorithmId::Gtg, 10, &[Feedback::Perfect])];
        let selection = select(&refs(&history), &PlannerConfig::default());
        assert_eq!(selection.algo_id, AlgorithmId::RussianFighter);
        assert_eq!(selection.phase, SelectionPhase::Exploration);
        assert_eq!(selection.scores.len(), 5);
    }

    #[test]
    fn test_exploration_ignores_scores() {
        // Four strategies with glowing feedback, Wave never tried
        let history = vec![
            week(1, AlgorithmId::Gtg, 10, &[Feedback::Perfect; 6]),
            week(2, AlgorithmId::RussianFighter, 12, &[Feedback::Perfect; 6]),
            week(3, AlgorithmId::Armstrong, 14, &[Feedback::Perfect; 6]),
            week(4, AlgorithmId::Density, 16, &[Feedback::Perfect; 6]),
        ];
        let selection = select(&refs(&history), &PlannerConfig::default());
        assert_eq!(selection.algo_id, AlgorithmId::Wave531);
    }

    #[test]
    fn test_unknown_ids_count_as_unused() {
        let history = vec![
            week(1, AlgorithmId::Gtg, 10, &[]),
            week(2, AlgorithmId::Unknown, 10, &[Feedback::Perfect]),
        ];
        let usage = usage_counts(&refs(&history));
        assert_eq!(usage.len(), 5);
        assert_eq!(usage[&AlgorithmId::Gtg], 1);
        assert_eq!(select(&refs(&history), &PlannerConfig::default()).algo_id, AlgorithmId::RussianFighter);
    }

    #[test]
    fn test_score_is_average_per_feedback() {
        let w1 = week(1, AlgorithmId::Gtg, 10, &[Feedback::Perfect, Feedback::TooHard]);
        let w2 = week(2, AlgorithmId::Gtg, 12, &[Feedback::DifficultFinished, Feedback::TooEasy]);
        // (2 - 2 + 1 - 0.5 + 3) / 4
        assert!((score(&[&w1, &w2]) - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_score_max_loss_penalty() {
        let w1 = week(1, AlgorithmId::Gtg, 12, &[Feedback::Perfect]);
        let w2 = week(2, AlgorithmId::Gtg, 10, &[Feedback::Perfect]);
        assert!((score(&[&w1, &w2]) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_without_feedback_is_zero() {
        let w1 = week(1, AlgorithmId::Gtg, 10, &[]);
        let w2 = week(2, AlgorithmId::Gtg, 15, &[]);
        assert_eq!(score(&[&w1, &w2]), 0.0);
        assert_eq!(score(&[]), 0.0);
    }

    #[test]
    fn test_unrecognized_feedback_not_scored() {
        let w1 = week(1, AlgorithmId::Gtg, 10, &[Feedback::Unrecognized, Feedback::Perfect]);
        assert!((score(&[&w1]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_idle_bonus_ordering() {
        let config = PlannerConfig::default();
        let history = vec![
            week(1, AlgorithmId::Gtg, 10, &[]),
            week(2, AlgorithmId::RussianFighter, 10, &[]),
            week(3, AlgorithmId::Armstrong, 10, &[]),
            week(4, AlgorithmId::Density, 10, &[]),
            week(5, AlgorithmId::Wave531, 10, &[]),
        ];
        let long = idle_bonus(&refs(&history), AlgorithmId::Gtg, &config);
        let short = idle_bonus(&refs(&history), AlgorithmId::RussianFighter, &config);
        let recent = idle_bonus(&refs(&history), AlgorithmId::Wave531, &config);
        assert!((long - 0.8).abs() < 1e-9);
        assert!((short - 0.4).abs() < 1e-9);
        assert_eq!(recent, 0.0);
        assert!(long > short && short > recent);
    }

    #[test]
    fn test_exploitation_prefers_best_score_with_bonus() {
        let history = vec![
            week(1, AlgorithmId::Gtg, 10, &[Feedback::TooHard]),
            week(2, AlgorithmId::RussianFighter, 10, &[Feedback::Perfect]),
            week(3, AlgorithmId::Armstrong, 10, &[Feedback::TooHard]),
            week(4, AlgorithmId::Density, 10, &[Feedback::TooHard]),
            week(5, AlgorithmId::Wave531, 10, &[Feedback::TooHard]),
        ];
        // RF: 2.0 + 0.4 idle bonus beats GTG: -2.0 + 0.8
        let selection = select(&refs(&history), &PlannerConfig::default());
        assert_eq!(selection.phase, SelectionPhase::Exploitation);
        assert_eq!(selection.algo_id, AlgorithmId::RussianFighter);
        assert!(selection.rationale.contains("Russian Fighter"));
        assert!(selection.rationale.contains("+2.0"));
    }

    #[test]
    fn test_exploitation_tie_breaks_on_catalog_order() {
        let history = vec![
            week(1, AlgorithmId::Wave531, 10, &[]),
            week(2, AlgorithmId::Density, 10, &[]),
            week(3, AlgorithmId::Armstrong, 10, &[]),
            week(4, AlgorithmId::RussianFighter, 10, &[]),
            week(5, AlgorithmId::Gtg, 10, &[]),
            week(6, AlgorithmId::Gtg, 10, &[]),
            week(7, AlgorithmId::Gtg, 10, &[]),
            week(8, AlgorithmId::Gtg, 10, &[]),
            week(9, AlgorithmId::Gtg, 10, &[]),
        ];
        // All scores 0; Wave, Density, Armstrong, RF all idle ≥ 4 weeks → 0.8 each
        let selection = select(&refs(&history), &PlannerConfig::default());
        assert_eq!(selection.algo_id, AlgorithmId::RussianFighter);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(1.25), "+1.2");
        assert_eq!(format_score(-0.5), "-0.5");
        assert_eq!(format_score(0.0), "0.0");
    }
}
