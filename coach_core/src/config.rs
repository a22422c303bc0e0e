//! Configuration file support for repcoach.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/repcoach/config.toml`.
//! The planner never reads globals: every component receives the
//! [`PlannerConfig`] it should use.

use crate::{DayCategory, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Every tunable the planning engine reads
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub plateau: PlateauConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    /// Weekly template, one entry per calendar training day
    #[serde(default = "default_distribution")]
    pub distribution: Vec<DistributionSlot>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            progression: ProgressionConfig::default(),
            plateau: PlateauConfig::default(),
            selection: SelectionConfig::default(),
            prediction: PredictionConfig::default(),
            distribution: default_distribution(),
        }
    }
}

/// Hard bounds applied to every generated training day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RulesConfig {
    #[serde(default = "default_min_sets")]
    pub min_sets: u32,
    #[serde(default = "default_max_sets")]
    pub max_sets: u32,
    #[serde(default = "default_min_rest")]
    pub min_rest: u32,
    #[serde(default = "default_max_rest")]
    pub max_rest: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            min_sets: default_min_sets(),
            max_sets: default_max_sets(),
            min_rest: default_min_rest(),
            max_rest: default_max_rest(),
        }
    }
}

/// Thresholds of the week-over-week progression analysis
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionConfig {
    /// Volume completion below this marks a critical failure
    #[serde(default = "default_critical_failure_threshold")]
    pub critical_failure_threshold: f64,
    /// Lowest factor a too-hard week can produce
    #[serde(default = "default_failure_factor_floor")]
    pub failure_factor_floor: f64,
    /// Assumed completion of a too-hard day with no recorded sets
    #[serde(default = "default_legacy_failure_completion")]
    pub legacy_failure_completion: f64,
    #[serde(default = "default_strategy_factor_min")]
    pub strategy_factor_min: f64,
    #[serde(default = "default_strategy_factor_max")]
    pub strategy_factor_max: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            critical_failure_threshold: default_critical_failure_threshold(),
            failure_factor_floor: default_failure_factor_floor(),
            legacy_failure_completion: default_legacy_failure_completion(),
            strategy_factor_min: default_strategy_factor_min(),
            strategy_factor_max: default_strategy_factor_max(),
        }
    }
}

/// Plateau detection window
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlateauConfig {
    #[serde(default = "default_min_history_weeks")]
    pub min_history_weeks: usize,
    #[serde(default = "default_lookback_weeks")]
    pub lookback_weeks: usize,
    #[serde(default = "default_detect_after_weeks")]
    pub detect_after_weeks: u32,
    #[serde(default = "default_watch_after_weeks")]
    pub watch_after_weeks: u32,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        Self {
            min_history_weeks: default_min_history_weeks(),
            lookback_weeks: default_lookback_weeks(),
            detect_after_weeks: default_detect_after_weeks(),
            watch_after_weeks: default_watch_after_weeks(),
        }
    }
}

/// Recency bonuses added to strategy scores in the exploitation phase
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SelectionConfig {
    #[serde(default = "default_long_idle_weeks")]
    pub long_idle_weeks: usize,
    #[serde(default = "default_long_idle_bonus")]
    pub long_idle_bonus: f64,
    #[serde(default = "default_short_idle_weeks")]
    pub short_idle_weeks: usize,
    #[serde(default = "default_short_idle_bonus")]
    pub short_idle_bonus: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            long_idle_weeks: default_long_idle_weeks(),
            long_idle_bonus: default_long_idle_bonus(),
            short_idle_weeks: default_short_idle_weeks(),
            short_idle_bonus: default_short_idle_bonus(),
        }
    }
}

/// Goal prediction parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionConfig {
    /// Assumed multiplicative max-reps growth per week
    #[serde(default = "default_weekly_growth")]
    pub weekly_growth: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            weekly_growth: default_weekly_growth(),
        }
    }
}

/// One calendar day of the weekly template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DistributionSlot {
    pub category: DayCategory,
    /// Share of the weekly volume carried by this day
    pub coeff: f64,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("repcoach")
}

fn default_min_sets() -> u32 {
    1
}

fn default_max_sets() -> u32 {
    60
}

fn default_min_rest() -> u32 {
    1
}

fn default_max_rest() -> u32 {
    1200
}

fn default_critical_failure_threshold() -> f64 {
    0.60
}

fn default_failure_factor_floor() -> f64 {
    0.70
}

fn default_legacy_failure_completion() -> f64 {
    0.75
}

fn default_strategy_factor_min() -> f64 {
    0.85
}

fn default_strategy_factor_max() -> f64 {
    1.15
}

fn default_min_history_weeks() -> usize {
    3
}

fn default_lookback_weeks() -> usize {
    4
}

fn default_detect_after_weeks() -> u32 {
    3
}

fn default_watch_after_weeks() -> u32 {
    2
}

fn default_long_idle_weeks() -> usize {
    4
}

fn default_long_idle_bonus() -> f64 {
    0.8
}

fn default_short_idle_weeks() -> usize {
    3
}

fn default_short_idle_bonus() -> f64 {
    0.4
}

fn default_weekly_growth() -> f64 {
    1.05
}

fn default_distribution() -> Vec<DistributionSlot> {
    [
        (DayCategory::Moderate, 0.18),
        (DayCategory::Intense, 0.22),
        (DayCategory::Light, 0.12),
        (DayCategory::Intense, 0.22),
        (DayCategory::Moderate, 0.18),
        (DayCategory::Light, 0.08),
    ]
    .into_iter()
    .map(|(category, coeff)| DistributionSlot { category, coeff })
    .collect()
}

impl PlannerConfig {
    /// Check internal consistency; returns one message per problem
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.rules.min_sets == 0 {
            errors.push("rules.min_sets must be at least 1".to_string());
        }
        if self.rules.min_sets > self.rules.max_sets {
            errors.push(format!(
                "rules.min_sets ({}) exceeds rules.max_sets ({})",
                self.rules.min_sets, self.rules.max_sets
            ));
        }
        if self.rules.min_rest > self.rules.max_rest {
            errors.push(format!(
                "rules.min_rest ({}) exceeds rules.max_rest ({})",
                self.rules.min_rest, self.rules.max_rest
            ));
        }
        let p = &self.progression;
        if !(p.strategy_factor_min.is_finite() && p.strategy_factor_max.is_finite()) {
            errors.push("progression.strategy_factor_min and strategy_factor_max must be finite".to_string());
        } else if p.strategy_factor_min > p.strategy_factor_max {
            errors.push("progression.strategy_factor_min exceeds strategy_factor_max".to_string());
        }
        if self.distribution.is_empty() {
            errors.push("distribution must contain at least one day".to_string());
        }
        if self.distribution.iter().any(|slot| slot.coeff <= 0.0) {
            errors.push("distribution coefficients must be positive".to_string());
        }
        if self.prediction.weekly_growth <= 1.0 {
            errors.push("prediction.weekly_growth must be greater than 1.0".to_string());
        }

        errors
    }
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        let errors = config.planner.validate();
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("repcoach").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
