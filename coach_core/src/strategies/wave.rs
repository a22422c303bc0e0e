use super::{round_reps, session_day, GenerationContext, Strategy};
use crate::types::{AlgorithmId, Day, DayCategory, Session};

struct Phase {
    label: &'static str,
    pct: f64,
    sets: u32,
    rest: u32,
    note: &'static str,
}

const PHASES: [Phase; 4] = [
    Phase { label: "Wave 5s (65%)", pct: 0.65, sets: 5, rest: 60, note: "Build phase: five moderate sets to lay the base." },
    Phase { label: "Wave 3s (75%)", pct: 0.75, sets: 3, rest: 90, note: "Progression phase: three heavier sets." },
    Phase { label: "Wave 1s (85%)", pct: 0.85, sets: 2, rest: 120, note: "Intensive phase: go for a personal best." },
    Phase { label: "Deload (40%)", pct: 0.40, sets: 3, rest: 45, note: "Deload week: active recovery before the next wave." },
];

/// 5-3-1 wave loading: four-week phases picked from the week number
#[derive(Clone, Copy, Debug, Default)]
pub struct Wave531;

/// 1-based phase within the four-week wave
pub fn wave_phase(week_number: u32) -> u32 {
    (week_number.max(1) - 1) % 4 + 1
}

impl Strategy for Wave531 {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Wave531
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Day> {
        let phase_number = wave_phase(ctx.week_number);
        let phase = &PHASES[phase_number as usize - 1];
        let deload = phase_number == 4;
        let mut days = Vec::with_capacity(ctx.config.distribution.len() * 2);

        for (i, slot) in ctx.config.distribution.iter().enumerate() {
            let multiplier = match slot.category {
                DayCategory::Light => 0.85,
                DayCategory::Moderate => 1.0,
                DayCategory::Intense => 1.10,
            };
            let effective = phase.pct * multiplier;
            let reps = ctx.reps_at(effective);

            let mut morning = session_day(
                i,
                Session::Morning,
                phase.label,
                phase.sets,
                reps,
                phase.rest,
                (effective * 100.0).round() as u32,
            );
            morning.explanation = format!(
                "5-3-1 wave, phase {}/4: {} sets of {} reps at {:.0}% of max, {}s rest. {}",
                phase_number,
                phase.sets,
                reps,
                effective * 100.0,
                phase.rest,
                phase.note
            );

            let back_off_reps = round_reps(reps as f64 * 0.80);
            let back_off_sets = phase.sets.saturating_sub(1).max(2);
            let back_off_rest = (phase.rest as f64 * 0.75).round() as u32;
            let label = if deload { "Back-off (Deload)" } else { "Back-off" };
            let mut evening = session_day(
                i,
                Session::Evening,
                label,
                back_off_sets,
                back_off_reps,
                back_off_rest,
                (effective * 80.0).round() as u32,
            );
            evening.explanation = format!(
                "5-3-1 wave, back-off: {} sets of {} reps at reduced intensity, {}s rest.",
                back_off_sets, back_off_reps, back_off_rest
            );

            days.push(morning);
            days.push(evening);
        }

        days
    }
}
