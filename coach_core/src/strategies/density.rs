use super::{session_day, GenerationContext, Strategy};
use crate::types::{AlgorithmId, Day, Session};

/// Seconds assumed per repetition when estimating block capacity
const SECONDS_PER_REP: u32 = 2;

const AMRAP_SECONDS: u32 = 5 * 60;
const AMRAP_REST: u32 = 20;

struct Block {
    label: &'static str,
    pct: f64,
    minutes: u32,
    rest: u32,
}

const BLOCKS: [Block; 6] = [
    Block { label: "Moderate Density", pct: 0.40, minutes: 8, rest: 20 },
    Block { label: "High Density", pct: 0.50, minutes: 8, rest: 15 },
    Block { label: "Light Density", pct: 0.35, minutes: 8, rest: 25 },
    Block { label: "High Density", pct: 0.50, minutes: 10, rest: 15 },
    Block { label: "Moderate Density", pct: 0.40, minutes: 8, rest: 20 },
    Block { label: "Light Density", pct: 0.35, minutes: 6, rest: 30 },
];

/// Density training: as many sets as fit in a timed block
#[derive(Clone, Copy, Debug, Default)]
pub struct Density;

impl Strategy for Density {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Density
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Day> {
        let mut days = Vec::with_capacity(ctx.config.distribution.len() * 2);

        for i in 0..ctx.config.distribution.len() {
            let block = &BLOCKS[i % BLOCKS.len()];
            let reps = ctx.reps_at(block.pct);
            let sets = estimated_sets(block.minutes * 60, reps, block.rest);
            let intensity = (block.pct * 100.0).round() as u32;

            let mut morning = session_day(i, Session::Morning, block.label, sets, reps, block.rest, intensity);
            morning.block_minutes = Some(block.minutes);
            morning.explanation = format!(
                "Density training, {}: {} reps every ~{}s for {} minutes. \
                 Estimated {} sets (~{} reps). Count your full sets and beat it next time.",
                block.label,
                reps,
                set_seconds(reps, block.rest),
                block.minutes,
                sets,
                sets.saturating_mul(reps)
            );

            let evening_reps = ctx.reps_at(0.30);
            let evening_sets = estimated_sets(AMRAP_SECONDS, evening_reps, AMRAP_REST);
            let mut evening = session_day(i, Session::Evening, "AMRAP 5min", evening_sets, evening_reps, AMRAP_REST, 30);
            evening.block_minutes = Some(AMRAP_SECONDS / 60);
            evening.explanation = format!(
                "Density AMRAP: as many reps as possible in 5 minutes, {} reps per set with {}s rest. \
                 Estimated ~{} sets. Log your total.",
                evening_reps, AMRAP_REST, evening_sets
            );

            days.push(morning);
            days.push(evening);
        }

        days
    }
}

/// Sets that fit into a block at [`SECONDS_PER_REP`] plus rest, at least 3
fn estimated_sets(block_seconds: u32, reps: u32, rest: u32) -> u32 {
    (block_seconds / set_seconds(reps, rest).max(1)).max(3)
}

fn set_seconds(reps: u32, rest: u32) -> u32 {
    reps.saturating_mul(SECONDS_PER_REP).saturating_add(rest)
}
