//! Canonical day-type buckets.
//!
//! Every strategy invents its own labels ("Ladder Down D3", "AMRAP 5min",
//! "Back-off (Deload)"...). Analysis compares performance across strategies,
//! so each label is reduced to one of three buckets at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical intensity bucket of a training day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayCategory {
    Light,
    Moderate,
    Intense,
}

const LIGHT_MARKERS: &[&str] = &[
    "light",
    "easy",
    "léger",
    "leger",
    "gtg evening",
    "evening-gtg",
    "gtg soir",
    "deload",
    "décharge",
    "back-off",
];

const INTENSE_MARKERS: &[&str] = &["intense", "high", "haute", "max", "amrap", "85"];

impl DayCategory {
    pub const ALL: [DayCategory; 3] = [DayCategory::Light, DayCategory::Moderate, DayCategory::Intense];

    /// Map a free-form label onto a bucket
    ///
    /// Case-insensitive substring match; light markers are checked first and
    /// anything unrecognized (including the empty string) is Moderate.
    pub fn from_label(label: &str) -> DayCategory {
        let lowered = label.to_lowercase();
        if LIGHT_MARKERS.iter().any(|m| lowered.contains(m)) {
            DayCategory::Light
        } else if INTENSE_MARKERS.iter().any(|m| lowered.contains(m)) {
            DayCategory::Intense
        } else {
            DayCategory::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayCategory::Light => "Light",
            DayCategory::Moderate => "Moderate",
            DayCategory::Intense => "Intense",
        }
    }
}

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_labels() {
        for label in ["Light", "GTG Evening", "Back-off (Deload)", "Deload (40%)", "Light Density", "evening-GTG"] {
            assert_eq!(DayCategory::from_label(label), DayCategory::Light, "{}", label);
        }
    }

    #[test]
    fn test_intense_labels() {
        for label in ["Intense", "High Density", "Max Set", "AMRAP 5min", "Wave 1s (85%)"] {
            assert_eq!(DayCategory::from_label(label), DayCategory::Intense, "{}", label);
        }
    }

    #[test]
    fn test_unrecognized_defaults_to_moderate() {
        for label in ["", "GTG Morning", "Ladder Down D2", "Wave 5s (65%)", "???"] {
            assert_eq!(DayCategory::from_label(label), DayCategory::Moderate, "{:?}", label);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(DayCategory::from_label("AMRAP"), DayCategory::Intense);
        assert_eq!(DayCategory::from_label("amrap"), DayCategory::Intense);
        assert_eq!(DayCategory::from_label("DELOAD"), DayCategory::Light);
    }

    #[test]
    fn test_french_legacy_labels() {
        assert_eq!(DayCategory::from_label("Léger"), DayCategory::Light);
        assert_eq!(DayCategory::from_label("Modéré"), DayCategory::Moderate);
        assert_eq!(DayCategory::from_label("Densité Haute"), DayCategory::Intense);
    }
}
