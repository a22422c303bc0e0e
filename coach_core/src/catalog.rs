//! Built-in catalog of training strategies.
//!
//! Static metadata only; behavior lives in [`crate::strategies`].

use crate::types::AlgorithmId;
use once_cell::sync::Lazy;

/// Immutable description of one training strategy
#[derive(Clone, Debug, PartialEq)]
pub struct AlgorithmDescriptor {
    pub id: AlgorithmId,
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub best_for: &'static str,
}

/// Cached catalog, in selection order
static CATALOG: Lazy<Vec<AlgorithmDescriptor>> = Lazy::new(build_catalog);

/// The five strategies in registration order
pub fn all() -> &'static [AlgorithmDescriptor] {
    &CATALOG
}

/// Look up a descriptor; `None` for [`AlgorithmId::Unknown`]
pub fn descriptor(id: AlgorithmId) -> Option<&'static AlgorithmDescriptor> {
    CATALOG.iter().find(|d| d.id == id)
}

/// Display name of a strategy, falling back to its raw id
pub fn display_name(id: AlgorithmId) -> &'static str {
    descriptor(id).map(|d| d.name).unwrap_or_else(|| id.as_str())
}

fn build_catalog() -> Vec<AlgorithmDescriptor> {
    vec![
        AlgorithmDescriptor {
            id: AlgorithmId::Gtg,
            name: "Grease The Groove",
            author: "Pavel Tsatsouline",
            description: "Sub-maximal neural practice at about 50% of max. High frequency, \
                          never to failure. Fast progress without accumulated fatigue.",
            best_for: "Beginners, plateaus, recovery",
        },
        AlgorithmDescriptor {
            id: AlgorithmId::RussianFighter,
            name: "Russian Fighter",
            author: "Pavel Tsatsouline",
            description: "Five-rung ladders from 50% down to 10% of max each session. \
                          Builds strength and muscular endurance together.",
            best_for: "Intermediate, strength and endurance",
        },
        AlgorithmDescriptor {
            id: AlgorithmId::Armstrong,
            name: "Armstrong Program",
            author: "Maj. Charles Lewis Armstrong",
            description: "Light/Moderate/Intense morning cycle plus one daily max-effort \
                          set in the evening.",
            best_for: "Intermediate to advanced, all-time records",
        },
        AlgorithmDescriptor {
            id: AlgorithmId::Density,
            name: "Density Training",
            author: "Mountain Tactical Institute",
            description: "Accumulate as much volume as possible inside timed blocks at \
                          35-50% of max. Develops work capacity and fatigue resistance.",
            best_for: "All levels, muscular endurance",
        },
        AlgorithmDescriptor {
            id: AlgorithmId::Wave531,
            name: "5-3-1 Wave Loading",
            author: "Jim Wendler (adapted)",
            description: "Four-week waves: 65% → 75% → 85% → deload, each phase with its \
                          own set count and rest.",
            best_for: "Advanced, steady long-term progression",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_entries_in_id_order() {
        let ids: Vec<_> = all().iter().map(|d| d.id).collect();
        assert_eq!(ids, AlgorithmId::ALL.to_vec());
    }

    #[test]
    fn test_descriptor_lookup() {
        assert_eq!(descriptor(AlgorithmId::Density).unwrap().name, "Density Training");
        assert!(descriptor(AlgorithmId::Unknown).is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        assert_eq!(display_name(AlgorithmId::Gtg), "Grease The Groove");
        assert_eq!(display_name(AlgorithmId::Unknown), "UNKNOWN");
    }
}
