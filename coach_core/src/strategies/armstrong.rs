use super::{round_reps, session_day, GenerationContext, Strategy};
use crate::types::{AlgorithmId, Day, Session};

struct CycleDay {
    label: &'static str,
    pct: f64,
    sets: u32,
    rest: u32,
}

/// Light, Moderate, Light, Intense, Moderate, Light
const CYCLE: [CycleDay; 6] = [
    CycleDay { label: "Light", pct: 0.60, sets: 5, rest: 60 },
    CycleDay { label: "Moderate", pct: 0.70, sets: 5, rest: 90 },
    CycleDay { label: "Light", pct: 0.60, sets: 5, rest: 60 },
    CycleDay { label: "Intense", pct: 0.80, sets: 4, rest: 120 },
    CycleDay { label: "Moderate", pct: 0.70, sets: 5, rest: 90 },
    CycleDay { label: "Light", pct: 0.60, sets: 5, rest: 60 },
];

/// Armstrong program: cycled morning sets plus one max-effort evening set
#[derive(Clone, Copy, Debug, Default)]
pub struct Armstrong;

impl Strategy for Armstrong {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Armstrong
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Day> {
        let mut days = Vec::with_capacity(ctx.config.distribution.len() * 2);

        for i in 0..ctx.config.distribution.len() {
            let cycle = &CYCLE[i % CYCLE.len()];
            let intensity = (cycle.pct * 100.0).round() as u32;
            let morning_reps = ctx.reps_at(cycle.pct);

            let mut morning = session_day(i, Session::Morning, cycle.label, cycle.sets, morning_reps, cycle.rest, intensity);
            morning.explanation = format!(
                "Armstrong, {} ({}%): {} sets of {} reps, {}s rest. Stay two reps short of failure.",
                cycle.label, intensity, cycle.sets, morning_reps, cycle.rest
            );

            let target = round_reps(morning_reps as f64 * 1.15);
            let mut evening = session_day(i, Session::Evening, "Max Set", 1, target, 0, 90);
            evening.explanation = format!(
                "Armstrong, evening max set: one all-out set (about {} reps). \
                 Stop only when form breaks down and write the result down.",
                target
            );

            days.push(morning);
            days.push(evening);
        }

        days
    }
}
