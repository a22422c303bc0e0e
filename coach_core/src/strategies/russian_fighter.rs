use super::{round_reps, session_day, GenerationContext, Strategy};
use crate::types::{AlgorithmId, Day, Session};

const LADDER_PCT: [f64; 5] = [0.50, 0.40, 0.30, 0.20, 0.10];

/// Russian Fighter: a five-rung ladder every session
///
/// Mornings run the ladder down, evenings run the same rungs back up.
#[derive(Clone, Copy, Debug, Default)]
pub struct RussianFighter;

impl Strategy for RussianFighter {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::RussianFighter
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Day> {
        let factor = ctx.factor();
        let mut days = Vec::with_capacity(ctx.config.distribution.len() * 2);

        for i in 0..ctx.config.distribution.len() {
            // intensity creeps up over the week
            let day_factor = factor * (0.85 + i as f64 * 0.03);
            let ladder: Vec<u32> = LADDER_PCT
                .iter()
                .map(|pct| round_reps(ctx.max_reps as f64 * pct * day_factor))
                .collect();
            let rungs = ladder.len() as u32;

            let mut morning = session_day(i, Session::Morning, format!("Ladder Down D{}", i + 1), rungs, ladder[0], 60, 50);
            morning.explanation = format!(
                "Russian Fighter, day {} morning: descending ladder {} reps, 60s rest. Total {} reps.",
                i + 1,
                join(&ladder),
                ladder.iter().fold(0u32, |total, r| total.saturating_add(*r))
            );
            morning.ladder = Some(ladder.clone());

            let reversed: Vec<u32> = ladder.iter().rev().copied().collect();
            let mut evening = session_day(i, Session::Evening, format!("Ladder Up D{}", i + 1), rungs, reversed[0], 90, 30);
            evening.explanation = format!(
                "Russian Fighter, day {} evening: ascending ladder {} reps, 90s rest. Finish stronger than you started.",
                i + 1,
                join(&reversed)
            );
            evening.ladder = Some(reversed);

            days.push(morning);
            days.push(evening);
        }

        days
    }
}

fn join(ladder: &[u32]) -> String {
    ladder
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}
