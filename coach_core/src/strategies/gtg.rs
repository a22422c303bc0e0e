use super::{round_reps, session_day, GenerationContext, Strategy};
use crate::types::{AlgorithmId, Day, Feedback, Session, Week};

/// Grease The Groove: sub-maximal sets at about half of max, never to failure
#[derive(Clone, Copy, Debug, Default)]
pub struct Gtg;

impl Strategy for Gtg {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Gtg
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Day> {
        let base = ctx.reps_at(0.50);
        let morning_reps = adjust_from_feedback(base, ctx.previous_week);
        let mut days = Vec::with_capacity(ctx.config.distribution.len() * 2);

        for (i, slot) in ctx.config.distribution.iter().enumerate() {
            let morning_sets = ((6.0 * slot.coeff / 0.18).round() as u32).clamp(4, 10);
            let mut morning = session_day(i, Session::Morning, "GTG Morning", morning_sets, morning_reps, 30, 50);
            morning.explanation = format!(
                "Grease The Groove, morning: {} sets of {} reps at 50% of your max. \
                 Never go to failure. 30s rest, spread the sets over the morning if you can.",
                morning_sets, morning_reps
            );

            let evening_sets = round_reps(morning_sets as f64 * 0.70).max(3);
            let evening_reps = round_reps(morning_reps as f64 * 0.85);
            let mut evening = session_day(i, Session::Evening, "GTG Evening", evening_sets, evening_reps, 30, 42);
            evening.explanation = format!(
                "Grease The Groove, evening: {} sets of {} reps to consolidate. \
                 Stop if you feel tired; freshness is mandatory. Day total: {} reps.",
                evening_sets,
                evening_reps,
                morning_sets
                    .saturating_mul(morning_reps)
                    .saturating_add(evening_sets.saturating_mul(evening_reps))
            );

            days.push(morning);
            days.push(evening);
        }

        days
    }
}

/// Scale reps down after a week full of failures, up after a week of easy days
fn adjust_from_feedback(base: u32, previous_week: Option<&Week>) -> u32 {
    let Some(prev) = previous_week else {
        return base;
    };
    let feedbacks: Vec<Feedback> = prev.training_days().filter_map(|d| d.recognized_feedback()).collect();
    if feedbacks.is_empty() {
        return base;
    }

    let total = feedbacks.len() as f64;
    let rate = |kind: Feedback| feedbacks.iter().filter(|f| **f == kind).count() as f64 / total;

    if rate(Feedback::TooHard) > 0.4 {
        round_reps(base as f64 * 0.90)
    } else if rate(Feedback::TooEasy) > 0.5 {
        round_reps(base as f64 * 1.08)
    } else {
        base
    }
}
