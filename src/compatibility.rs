//! Compatibility between two preference records
//!
//! Two seekers are compatible when each accepts the other's gender and
//! species, and their kinks overlap (or either side accepts any kink).

use std::collections::HashSet;

use crate::preferences::Preferences;

/// Default number of shared kinks required for a match
pub const DEFAULT_MIN_KINK_OVERLAP: usize = 1;

/// Tunable matching rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// Number of distinct kinks both sides must share
    pub min_kink_overlap: usize,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            min_kink_overlap: DEFAULT_MIN_KINK_OVERLAP,
        }
    }
}

impl MatchRules {
    /// Check whether `a` and `b` may be paired
    ///
    /// Symmetric: `compatible(a, b) == compatible(b, a)`.
    pub fn compatible(&self, a: &Preferences, b: &Preferences) -> bool {
        genders_match(a, b) && species_match(a, b) && self.kinks_match(a, b)
    }

    fn kinks_match(&self, a: &Preferences, b: &Preferences) -> bool {
        if a.kinks.is_any() || b.kinks.is_any() {
            return true;
        }
        shared_kinks(a, b) >= self.min_kink_overlap
    }
}

fn genders_match(a: &Preferences, b: &Preferences) -> bool {
    a.match_gender.admits(&b.gender) && b.match_gender.admits(&a.gender)
}

fn species_match(a: &Preferences, b: &Preferences) -> bool {
    a.match_species.admits(&b.species) && b.match_species.admits(&a.species)
}

/// Number of distinct kinks listed by both sides
fn shared_kinks(a: &Preferences, b: &Preferences) -> usize {
    let theirs: HashSet<&str> = b.kinks.values().iter().map(String::as_str).collect();
    let ours: HashSet<&str> = a.kinks.values().iter().map(String::as_str).collect();
    ours.intersection(&theirs).count()
}
