//! Week generation.
//!
//! [`WeekPlanner`] wires the pieces together for one exercise:
//! selector → progression analysis → strategy days → split adjustment →
//! plateau detection → advice. It holds no state besides its configuration;
//! every call recomputes everything from the history it is handed.

use crate::advice;
use crate::config::PlannerConfig;
use crate::insights;
use crate::plateau;
use crate::progression;
use crate::selector;
use crate::strategies::{self, GenerationContext};
use crate::types::{Day, Week};
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// What the caller asks for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeekRequest<'a> {
    pub week_number: u32,
    /// Freshly tested max; callers reject values below 1
    pub max_reps: u32,
    pub exercise_type: &'a str,
    /// Explicit goal; falls back to the previous week's goal when absent
    pub target_reps: Option<u32>,
}

/// Stateless week generator bound to one configuration
#[derive(Clone, Debug, Default)]
pub struct WeekPlanner {
    config: PlannerConfig,
}

impl WeekPlanner {
    /// Bind a planner to `config`, rejecting inconsistent bounds
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generate a week stamped with the current time
    pub fn generate_week(&self, request: WeekRequest<'_>, previous_week: Option<&Week>, history: &[Week]) -> Week {
        self.generate_week_at(request, previous_week, history, Utc::now())
    }

    /// Generate a week with an explicit timestamp
    ///
    /// `history` may hold any exercise; it is filtered here. Only `date`
    /// depends on `now`.
    pub fn generate_week_at(
        &self,
        request: WeekRequest<'_>,
        previous_week: Option<&Week>,
        history: &[Week],
        now: DateTime<Utc>,
    ) -> Week {
        let config = &self.config;
        let relevant: Vec<&Week> = history
            .iter()
            .filter(|w| w.exercise_type == request.exercise_type)
            .collect();

        let selection = selector::select(&relevant, config);
        let progression = progression::analyze(request.max_reps, previous_week, history, config);

        let ctx = GenerationContext {
            week_number: request.week_number,
            max_reps: request.max_reps,
            progression_factor: progression.factor,
            previous_week,
            config,
        };
        let mut training_days = strategies::generate_days(selection.algo_id, &ctx);

        let split_applied = match previous_week {
            Some(prev) => {
                let completion = strategies::failure_completion_by_category(prev);
                strategies::apply_split_adjustment(&mut training_days, &completion, &config.rules)
            }
            None => false,
        };

        let plateau_info = plateau::detect(previous_week, history, request.exercise_type, config);
        let advice = advice::compose(
            request.max_reps,
            previous_week,
            &progression,
            plateau_info.as_ref(),
            &selection,
        );

        let mut program = Vec::with_capacity(training_days.len() + 1);
        program.push(Day::test(request.max_reps));
        program.extend(training_days);

        let mut week = Week::new(request.week_number, request.exercise_type, request.max_reps, program);
        week.target_reps = request
            .target_reps
            .or_else(|| previous_week.and_then(|p| p.target_reps));
        week.date = now;
        week.algo_id = selection.algo_id;
        week.selection_phase = Some(selection.phase);
        week.selection_reason = selection.rationale;
        week.algo_scores = selection.scores;
        week.progression_factor = progression.factor;
        week.advice = advice;
        week.day_type_performance = progression.day_type_performance;
        week.plateau_info = plateau_info;
        week.adaptation_metrics = progression.adaptation_metrics;
        week.volume_completion_rate = progression.volume_completion_rate;
        week.critical_failure = progression.critical_failure;
        week.consecutive_failures = progression.consecutive_failures;
        week.split_applied = split_applied;

        tracing::info!(
            "Generated week {} for {}: {} (factor {:.2}, {} reps total, {})",
            week.week_number,
            week.exercise_type,
            week.algo_id,
            week.progression_factor,
            week.total_volume,
            insights::plan_state(&week)
        );

        week
    }
}

/// One-shot generation with the default configuration
pub fn generate_week(
    week_number: u32,
    max_reps: u32,
    exercise_type: &str,
    previous_week: Option<&Week>,
    target_reps: Option<u32>,
    history: &[Week],
) -> Week {
    let request = WeekRequest {
        week_number,
        max_reps,
        exercise_type,
        target_reps,
    };
    WeekPlanner::default().generate_week(request, previous_week, history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::PlanState;
    use crate::logging;
    use crate::types::{AlgorithmId, DayCategory, Feedback, SelectionPhase};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()
    }

    fn request(week_number: u32, max_reps: u32) -> WeekRequest<'static> {
        WeekRequest {
            week_number,
            max_reps,
            exercise_type: "pushups",
            target_reps: None,
        }
    }

    /// Build a history by planning week after week, rating every day
    fn plan_history(maxes: &[u32], feedback: Feedback) -> Vec<Week> {
        let planner = WeekPlanner::default();
        let mut history: Vec<Week> = Vec::new();
        for (i, max) in maxes.iter().enumerate() {
            let mut week =
                planner.generate_week_at(request(i as u32 + 1, *max), history.last(), &history, fixed_now());
            for day in week.program.iter_mut().filter(|d| !d.is_test()) {
                day.feedback = Some(feedback);
            }
            history.push(week);
        }
        history
    }

    fn assert_bounds(week: &Week, config: &PlannerConfig) {
        for day in week.training_days() {
            assert!(day.sets >= config.rules.min_sets && day.sets <= config.rules.max_sets, "{:?}", day);
            assert!(day.reps >= 1, "{:?}", day);
            if day.sets > 1 {
                assert!(day.rest >= config.rules.min_rest && day.rest <= config.rules.max_rest, "{:?}", day);
            }
        }
    }

    #[test]
    fn test_first_week_scenario() {
        logging::init_test();
        let week = WeekPlanner::default().generate_week_at(request(1, 20), None, &[], fixed_now());

        assert_eq!(week.program.len(), 13);
        assert_eq!(week.program[0].day_type, "Test");
        assert_eq!((week.program[0].sets, week.program[0].reps, week.program[0].rest), (1, 20, 0));
        assert!(week.training_days().all(|d| !d.split_applied));
        assert_eq!(week.progression_factor, 1.0);
        assert_eq!(week.algo_id, AlgorithmId::Gtg);
        assert_eq!(week.selection_phase, Some(SelectionPhase::FirstWeek));
        assert!(week.algo_scores.is_empty());
        assert!(week.plateau_info.is_none());
        assert!(!week.split_applied);
        assert_eq!(insights::plan_state(&week), PlanState::FirstWeek);
        assert_eq!(week.total_volume, week.program.iter().map(|d| d.planned_volume()).sum::<u32>());
    }

    #[test]
    fn test_total_failure_on_one_day() {
        let planner = WeekPlanner::default();
        let mut prev = planner.generate_week_at(request(1, 20), None, &[], fixed_now());
        let day = prev.day_mut(2).unwrap();
        assert_eq!(day.category(), DayCategory::Moderate);
        day.feedback = Some(Feedback::TooHard);
        day.actual_sets = Some(0);
        day.actual_last_reps = Some(0);
        assert_eq!(progression::day_completion_rate(day), Some(0.0));

        let history = vec![prev.clone()];
        let week = planner.generate_week_at(request(2, 20), Some(&prev), &history, fixed_now());

        assert!(week.progression_factor >= 0.70 && week.progression_factor < 1.0);
        assert!(week.volume_completion_rate < 1.0);
        assert!(week.split_applied);
        assert!(week
            .training_days()
            .any(|d| d.split_applied && d.category() == DayCategory::Moderate));
        assert!(week
            .training_days()
            .filter(|d| d.category() != DayCategory::Moderate)
            .all(|d| !d.split_applied));
        assert_eq!(week.consecutive_failures, 1);
        assert_bounds(&week, planner.config());
    }

    #[test]
    fn test_total_failure_on_every_day_floors_factor() {
        let planner = WeekPlanner::default();
        let mut prev = planner.generate_week_at(request(1, 20), None, &[], fixed_now());
        for day in prev.program.iter_mut().filter(|d| !d.is_test()) {
            day.feedback = Some(Feedback::TooHard);
            day.actual_sets = Some(0);
            day.actual_last_reps = Some(0);
        }

        let history = vec![prev.clone()];
        let week = planner.generate_week_at(request(2, 20), Some(&prev), &history, fixed_now());

        assert!(week.volume_completion_rate.abs() < 1e-9);
        assert!((week.progression_factor - 0.70).abs() < 1e-9);
        assert!(week.critical_failure);
        assert!(insights::alerts(&week)
            .iter()
            .any(|a| matches!(a, insights::Alert::CriticalFailure { .. })));
    }

    #[test]
    fn test_unused_strategy_is_explored() {
        let planner = WeekPlanner::default();
        let mut history = Vec::new();
        let algos = [
            AlgorithmId::Gtg,
            AlgorithmId::RussianFighter,
            AlgorithmId::Armstrong,
            AlgorithmId::Density,
            AlgorithmId::Gtg,
        ];
        for (i, algo) in algos.iter().enumerate() {
            let mut week = Week::new(i as u32 + 1, "pushups", 10 + i as u32 * 2, vec![Day::test(10)]);
            week.algo_id = *algo;
            let mut day = Day::training(2, "Moderate", 4, 8, 60);
            day.feedback = Some(Feedback::Perfect);
            week.program.push(day);
            history.push(week);
        }

        let week = planner.generate_week_at(request(6, 20), history.last(), &history, fixed_now());
        assert_eq!(week.algo_id, AlgorithmId::Wave531);
        assert_eq!(week.selection_phase, Some(SelectionPhase::Exploration));
        assert_eq!(week.algo_scores.len(), 5);
    }

    #[test]
    fn test_steady_gains_no_plateau() {
        let history = plan_history(&[10, 12, 14, 16], Feedback::Perfect);
        let week = WeekPlanner::default().generate_week_at(request(5, 18), history.last(), &history, fixed_now());

        let info = week.plateau_info.clone().unwrap();
        assert!(!info.detected);
        assert_eq!(insights::plan_state(&week), PlanState::SteadyState);
    }

    #[test]
    fn test_flat_max_flags_plateau() {
        let history = plan_history(&[15, 15, 15, 15], Feedback::Perfect);
        let week = WeekPlanner::default().generate_week_at(request(5, 15), history.last(), &history, fixed_now());

        let info = week.plateau_info.clone().unwrap();
        assert!(info.detected);
        assert!(info.weeks_since_gain >= 3);
        assert!(week.advice.contains("Plateau:"));
        assert_eq!(insights::plan_state(&week), PlanState::PlateauFlagged);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let history = plan_history(&[10, 11, 13], Feedback::DifficultFinished);
        let planner = WeekPlanner::default();
        let a = planner.generate_week_at(request(4, 14), history.last(), &history, fixed_now());
        let b = planner.generate_week_at(request(4, 14), history.last(), &history, fixed_now());
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_bounds_across_strategies() {
        let planner = WeekPlanner::default();
        for max_reps in [1, 3, 25, 150] {
            let history = plan_history(&[max_reps; 6], Feedback::TooEasy);
            for week in &history {
                assert_bounds(week, planner.config());
            }
        }
    }

    #[test]
    fn test_cycles_through_all_strategies_first() {
        let history = plan_history(&[10, 11, 12, 13, 14], Feedback::Perfect);
        let algos: Vec<AlgorithmId> = history.iter().map(|w| w.algo_id).collect();
        assert_eq!(algos, AlgorithmId::ALL.to_vec());

        let sixth = WeekPlanner::default().generate_week_at(request(6, 15), history.last(), &history, fixed_now());
        assert_eq!(sixth.selection_phase, Some(SelectionPhase::Exploitation));
    }

    #[test]
    fn test_target_carries_over() {
        let planner = WeekPlanner::default();
        let first = planner.generate_week_at(
            WeekRequest { target_reps: Some(50), ..request(1, 20) },
            None,
            &[],
            fixed_now(),
        );
        assert_eq!(first.target_reps, Some(50));

        let history = vec![first.clone()];
        let second = planner.generate_week_at(request(2, 21), Some(&first), &history, fixed_now());
        assert_eq!(second.target_reps, Some(50));

        let third = planner.generate_week_at(
            WeekRequest { target_reps: Some(60), ..request(3, 22) },
            Some(&second),
            &history,
            fixed_now(),
        );
        assert_eq!(third.target_reps, Some(60));
    }

    #[test]
    fn test_other_exercises_do_not_drive_selection() {
        let mut history = plan_history(&[10, 11], Feedback::Perfect);
        for week in history.iter_mut() {
            week.exercise_type = "pullups".to_string();
        }
        let week = WeekPlanner::default().generate_week_at(request(1, 20), None, &history, fixed_now());
        assert_eq!(week.algo_id, AlgorithmId::Gtg);
        assert_eq!(week.selection_phase, Some(SelectionPhase::FirstWeek));
    }

    #[test]
    fn test_inconsistent_config_is_rejected() {
        let mut config = PlannerConfig::default();
        config.rules.min_sets = 10;
        config.rules.max_sets = 5;
        let err = WeekPlanner::new(config).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("min_sets")));

        let mut config = PlannerConfig::default();
        config.progression.strategy_factor_min = f64::NAN;
        assert!(WeekPlanner::new(config).is_err());

        assert!(WeekPlanner::new(PlannerConfig::default()).is_ok());
    }

    #[test]
    fn test_huge_max_under_every_strategy() {
        let planner = WeekPlanner::default();
        let mut history: Vec<Week> = Vec::new();
        for week_number in 1..=6 {
            let week =
                planner.generate_week_at(request(week_number, 2_000_000_000), history.last(), &history, fixed_now());
            assert_bounds(&week, planner.config());
            assert_eq!(week.total_volume, u32::MAX);
            history.push(week);
        }
        let algos: Vec<AlgorithmId> = history.iter().take(5).map(|w| w.algo_id).collect();
        assert_eq!(algos, AlgorithmId::ALL.to_vec());
    }

    #[test]
    fn test_free_function_uses_defaults() {
        let week = generate_week(1, 12, "situps", None, Some(30), &[]);
        assert_eq!(week.exercise_type, "situps");
        assert_eq!(week.target_reps, Some(30));
        assert_eq!(week.program.len(), 13);
    }
}
