//! Plain-text advisory attached to every generated week.

use crate::catalog;
use crate::progression::ProgressionResult;
use crate::selector::{format_score, Selection};
use crate::types::{AlgorithmId, Feedback, PlateauInfo, Week};

/// Compose the week's advice
///
/// First weeks get a welcome; later weeks get the max delta, the feedback
/// reading, any plateau warning, the selection rationale and the score table.
pub fn compose(
    current_max: u32,
    previous_week: Option<&Week>,
    progression: &ProgressionResult,
    plateau: Option<&PlateauInfo>,
    selection: &Selection,
) -> String {
    let Some(prev) = previous_week else {
        return welcome(selection.algo_id);
    };

    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        max_delta_line(prev.max_reps, current_max),
        feedback_line(progression)
    ));

    if let Some(info) = plateau.filter(|p| p.detected) {
        if let Some(suggestion) = &info.suggestion {
            lines.push(format!("Plateau: {}", suggestion));
        }
    }

    lines.push(String::new());
    lines.push(format!("Next week's strategy: {}", selection.rationale));

    if !selection.scores.is_empty() {
        lines.push(String::new());
        lines.push("Strategy scores:".to_string());
        lines.extend(score_table(&selection.scores, selection.algo_id));
    }

    lines.join("\n")
}

fn welcome(algo_id: AlgorithmId) -> String {
    match catalog::descriptor(algo_id) {
        Some(d) => format!(
            "Welcome! Your program starts with {} ({}).\n{}\n\n\
             Rate each session: the planner reads your feedback every week to pick the strategy that suits you best.",
            d.name, d.author, d.description
        ),
        None => "Welcome! Rate each session so the planner can adapt your program.".to_string(),
    }
}

fn max_delta_line(previous_max: u32, current_max: u32) -> String {
    let diff = current_max as i64 - previous_max as i64;
    match diff {
        d if d > 0 => format!(
            "+{} rep{}! Progress {} → {}.",
            d,
            if d > 1 { "s" } else { "" },
            previous_max,
            current_max
        ),
        0 => format!("Max stable ({} reps), normal after a hard week.", current_max),
        _ => format!(
            "Slight drop: {} → {} reps. Was recovery enough?",
            previous_max, current_max
        ),
    }
}

fn feedback_line(progression: &ProgressionResult) -> String {
    match progression.dominant_feedback {
        Some(Feedback::TooEasy) => "Last week was too easy, volume goes up.".to_string(),
        Some(Feedback::TooHard) => format!(
            "Technical failure: {:.0}% of the planned volume completed.",
            progression.volume_completion_rate * 100.0
        ),
        Some(Feedback::DifficultFinished) => {
            "Difficulty well calibrated, moderate progression applied.".to_string()
        }
        _ => "Week well handled, progression continues.".to_string(),
    }
}

/// Scores sorted high to low, the chosen strategy marked
pub fn score_table(scores: &crate::types::AlgorithmScores, chosen: AlgorithmId) -> Vec<String> {
    let mut ranked: Vec<(AlgorithmId, f64)> = scores.iter().map(|(id, s)| (*id, *s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .map(|(id, score)| {
            let marker = if id == chosen { "  <- chosen" } else { "" };
            format!("  {:<20} {:>5}{}", catalog::display_name(id), format_score(score), marker)
        })
        .collect()
}
