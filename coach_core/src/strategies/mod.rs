//! Day prescription strategies.
//!
//! Every strategy walks the weekly distribution template and emits two
//! sessions (morning and evening) per calendar day. The Test day is never
//! produced here; the planner prepends it.
//!
//! Results of [`generate_days`] are always clamped to the configured rules,
//! whatever the individual strategy computed.

mod armstrong;
mod density;
mod gtg;
mod russian_fighter;
mod wave;

pub use armstrong::Armstrong;
pub use density::Density;
pub use gtg::Gtg;
pub use russian_fighter::RussianFighter;
pub use wave::Wave531;

use crate::config::{PlannerConfig, RulesConfig};
use crate::types::{AlgorithmId, Day, DayCategory, Session, Week};
use std::collections::BTreeMap;

/// Everything a strategy may read while generating a week
#[derive(Clone, Copy, Debug)]
pub struct GenerationContext<'a> {
    pub week_number: u32,
    pub max_reps: u32,
    /// Raw progression factor; strategies read [`GenerationContext::factor`]
    pub progression_factor: f64,
    pub previous_week: Option<&'a Week>,
    pub config: &'a PlannerConfig,
}

impl GenerationContext<'_> {
    /// Progression factor clamped to the strategy range
    pub fn factor(&self) -> f64 {
        let p = &self.config.progression;
        self.progression_factor
            .clamp(p.strategy_factor_min, p.strategy_factor_max)
    }

    /// `max_reps × pct × factor`, rounded, at least 1
    pub fn reps_at(&self, pct: f64) -> u32 {
        round_reps(self.max_reps as f64 * pct * self.factor())
    }
}

/// One prescription algorithm
pub trait Strategy: Send + Sync {
    fn id(&self) -> AlgorithmId;

    /// Training days for the week, ordered by day number
    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Day>;
}

/// Dispatch an algorithm id to its strategy; unknown ids fall back to GTG
pub fn for_algorithm(id: AlgorithmId) -> &'static dyn Strategy {
    match id {
        AlgorithmId::Gtg => &Gtg,
        AlgorithmId::RussianFighter => &RussianFighter,
        AlgorithmId::Armstrong => &Armstrong,
        AlgorithmId::Density => &Density,
        AlgorithmId::Wave531 => &Wave531,
        AlgorithmId::Unknown => {
            tracing::warn!("No strategy for unknown algorithm id, falling back to GTG");
            &Gtg
        }
    }
}

/// Run a strategy and clamp every day to the configured bounds
pub fn generate_days(id: AlgorithmId, ctx: &GenerationContext<'_>) -> Vec<Day> {
    for_algorithm(id)
        .generate(ctx)
        .into_iter()
        .map(|day| clamp_day(day, &ctx.config.rules))
        .collect()
}

/// Round to the nearest whole rep with a floor of 1
pub(crate) fn round_reps(value: f64) -> u32 {
    if value.is_finite() && value > 1.0 {
        value.round() as u32
    } else {
        1
    }
}

/// Morning/evening session skeleton for template slot `index`
pub(crate) fn session_day(
    index: usize,
    session: Session,
    day_type: impl Into<String>,
    sets: u32,
    reps: u32,
    rest: u32,
    intensity: u32,
) -> Day {
    let offset = match session {
        Session::Morning => 2,
        Session::Evening => 3,
    };
    let mut day = Day::training(index as u32 * 2 + offset, day_type, sets, reps, rest);
    day.calendar_day = Some(index as u32 + 2);
    day.session = Some(session);
    day.intensity = intensity;
    day
}

/// Enforce set, rest and rep bounds on one day
///
/// A single all-out set with no rest keeps its rest of 0.
pub fn clamp_day(mut day: Day, rules: &RulesConfig) -> Day {
    day.sets = day.sets.clamp(rules.min_sets, rules.max_sets);
    day.reps = day.reps.max(1);
    if !(day.sets == 1 && day.rest == 0) {
        day.rest = day.rest.clamp(rules.min_rest, rules.max_rest);
    }
    if let Some(ladder) = day.ladder.as_mut() {
        for rung in ladder.iter_mut() {
            *rung = (*rung).max(1);
        }
    }
    day
}

/// Worst completion rate per canonical category in a week
///
/// Only too-hard days with recorded partial work contribute.
pub fn failure_completion_by_category(week: &Week) -> BTreeMap<DayCategory, f64> {
    let mut worst: BTreeMap<DayCategory, f64> = BTreeMap::new();
    for day in week.training_days() {
        if let Some(rate) = crate::progression::day_completion_rate(day) {
            worst
                .entry(day.category())
                .and_modify(|r| *r = r.min(rate))
                .or_insert(rate);
        }
    }
    worst
}

/// Rebalance days whose category failed hard last week into more, shorter sets
///
/// Returns true if at least one day was flagged as split.
pub fn apply_split_adjustment(
    days: &mut [Day],
    completion: &BTreeMap<DayCategory, f64>,
    rules: &RulesConfig,
) -> bool {
    let mut any_split = false;

    for day in days.iter_mut().filter(|d| d.sets > 1) {
        let Some(&rate) = completion.get(&day.category()) else {
            continue;
        };
        let planned = day.planned_volume() as f64;

        if rate < 0.60 {
            let target = planned * (rate * 0.95).max(0.70);
            split_into(day, 1.5, target, 20, rules);
        } else if rate < 0.75 {
            split_into(day, 1.2, planned * 0.85, 20, rules);
        } else if rate < 0.85 {
            let reps = day.reps.saturating_sub(1).max(1);
            day.reps = reps;
            day.sets = round_reps(planned * 0.92 / reps as f64).clamp(rules.min_sets, rules.max_sets);
            day.rest = day.rest.saturating_add(15).clamp(rules.min_rest, rules.max_rest);
            day.ladder = None;
            continue;
        } else {
            continue;
        }

        any_split = true;
        tracing::debug!(
            "Split day {} ({}): {} x {} after {:.0}% completion",
            day.day,
            day.day_type,
            day.sets,
            day.reps,
            rate * 100.0
        );
    }

    any_split
}

fn split_into(day: &mut Day, set_multiplier: f64, target_volume: f64, extra_rest: u32, rules: &RulesConfig) {
    let sets = round_reps(day.sets as f64 * set_multiplier).clamp(rules.min_sets, rules.max_sets);
    day.sets = sets;
    day.reps = round_reps(target_volume / sets as f64);
    day.rest = day.rest.saturating_add(extra_rest).clamp(rules.min_rest, rules.max_rest);
    day.ladder = None;
    day.split_applied = true;
    day.explanation = format!(
        "Split applied after last week's failure: {} sets of {} reps with {}s rest to rebuild volume without failing again. {}",
        day.sets, day.reps, day.rest, day.explanation
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Feedback;

    fn ctx(config: &PlannerConfig, factor: f64) -> GenerationContext<'_> {
        GenerationContext {
            week_number: 1,
            max_reps: 20,
            progression_factor: factor,
            previous_week: None,
            config,
        }
    }

    #[test]
    fn test_factor_is_clamped() {
        let config = PlannerConfig::default();
        assert!((ctx(&config, 0.70).factor() - 0.85).abs() < 1e-9);
        assert!((ctx(&config, 1.30).factor() - 1.15).abs() < 1e-9);
        assert!((ctx(&config, 1.05).factor() - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_every_strategy_emits_two_sessions_per_slot() {
        let config = PlannerConfig::default();
        let context = ctx(&config, 1.0);
        for id in AlgorithmId::ALL {
            let days = generate_days(id, &context);
            assert_eq!(days.len(), 12, "{}", id);
            let numbers: Vec<u32> = days.iter().map(|d| d.day).collect();
            assert_eq!(numbers, (2..=13).collect::<Vec<_>>(), "{}", id);
            assert!(days.iter().all(|d| d.calendar_day.is_some() && d.session.is_some()));
        }
    }

    #[test]
    fn test_bounds_hold_for_tiny_and_huge_max() {
        let config = PlannerConfig::default();
        for max_reps in [1, 2, 500] {
            for id in AlgorithmId::ALL {
                let context = GenerationContext { max_reps, ..ctx(&config, 1.0) };
                for day in generate_days(id, &context) {
                    assert!(day.sets >= 1 && day.sets <= 60, "{} {:?}", id, day);
                    assert!(day.reps >= 1);
                    if day.sets > 1 {
                        assert!(day.rest >= 1 && day.rest <= 1200);
                    }
                }
            }
        }
    }

    #[test]
    fn test_unknown_falls_back_to_gtg() {
        assert_eq!(for_algorithm(AlgorithmId::Unknown).id(), AlgorithmId::Gtg);
    }

    #[test]
    fn test_clamp_day_keeps_max_set_rest() {
        let rules = RulesConfig::default();
        let max_set = clamp_day(Day::training(3, "Max Set", 1, 20, 0), &rules);
        assert_eq!(max_set.rest, 0);
        let straight = clamp_day(Day::training(2, "Light", 0, 0, 5000), &rules);
        assert_eq!((straight.sets, straight.reps, straight.rest), (1, 1, 1200));
    }

    #[test]
    fn test_total_failure_splits_matching_category() {
        let rules = RulesConfig::default();
        let mut days = vec![
            Day::training(2, "Moderate", 4, 10, 60),
            Day::training(3, "Light", 4, 10, 60),
            Day::training(5, "Max Set", 1, 20, 0),
        ];
        let mut completion = BTreeMap::new();
        completion.insert(DayCategory::Moderate, 0.0);
        completion.insert(DayCategory::Intense, 0.0);

        assert!(apply_split_adjustment(&mut days, &completion, &rules));
        // 6 sets, 40 × 0.70 = 28 reps over 6 sets
        assert_eq!((days[0].sets, days[0].reps, days[0].rest), (6, 5, 80));
        assert!(days[0].split_applied);
        assert!(!days[1].split_applied);
        // single max set is left alone
        assert!(!days[2].split_applied);
        assert_eq!(days[2].sets, 1);
    }

    #[test]
    fn test_mild_failure_trims_reps_without_flag() {
        let rules = RulesConfig::default();
        let mut days = vec![Day::training(2, "Moderate", 4, 10, 60)];
        let mut completion = BTreeMap::new();
        completion.insert(DayCategory::Moderate, 0.80);

        assert!(!apply_split_adjustment(&mut days, &completion, &rules));
        // 40 × 0.92 / 9 = 4.09
        assert_eq!((days[0].sets, days[0].reps, days[0].rest), (4, 9, 75));
        assert!(!days[0].split_applied);
    }

    #[test]
    fn test_worst_completion_per_category() {
        let mut a = Day::training(2, "Moderate", 4, 10, 60);
        a.feedback = Some(Feedback::TooHard);
        a.actual_sets = Some(2);
        a.actual_last_reps = Some(0);
        let mut b = Day::training(3, "Moderate Density", 4, 10, 60);
        b.feedback = Some(Feedback::TooHard);
        b.actual_sets = Some(1);
        b.actual_last_reps = Some(0);
        let mut legacy = Day::training(4, "Light", 4, 10, 60);
        legacy.feedback = Some(Feedback::TooHard);

        let week = Week::new(1, "pushups", 20, vec![Day::test(20), a, b, legacy]);
        let worst = failure_completion_by_category(&week);
        assert_eq!(worst.len(), 1);
        assert!((worst[&DayCategory::Moderate] - 0.25).abs() < 1e-9);
    }
}
