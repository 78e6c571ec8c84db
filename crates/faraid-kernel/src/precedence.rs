//! Phase 1: precedence (hijab) resolution.
//!
//! Three rules, applied in order against the result of the previous rule:
//!
//! 1. father blocks the paternal grandfather and full siblings
//! 2. mother blocks the paternal grandmother
//! 3. a son blocks grandchildren through a son and full siblings
//!
//! No other relation blocks. A category excluded by an earlier rule keeps
//! that rule's blocker.

use crate::heir::{HeirCategory, Heirs};
use std::collections::BTreeMap;

const RULES: [(HeirCategory, &[HeirCategory]); 3] = [
    (
        HeirCategory::Father,
        &[
            HeirCategory::PaternalGrandfather,
            HeirCategory::Brothers,
            HeirCategory::Sisters,
        ],
    ),
    (HeirCategory::Mother, &[HeirCategory::PaternalGrandmother]),
    (
        HeirCategory::Sons,
        &[
            HeirCategory::GrandsonsThroughSon,
            HeirCategory::GranddaughtersThroughSon,
            HeirCategory::Brothers,
            HeirCategory::Sisters,
        ],
    ),
];

/// Output of phase 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precedence {
    /// The validated input, untouched.
    pub original: Heirs,
    /// The input with every blocked category cleared.
    pub working: Heirs,
    /// Blocked category → the heir that blocked it.
    pub blocked: BTreeMap<HeirCategory, HeirCategory>,
}

impl Precedence {
    pub fn blocker_of(&self, category: HeirCategory) -> Option<HeirCategory> {
        self.blocked.get(&category).copied()
    }
}

pub fn resolve(heirs: &Heirs) -> Precedence {
    let (working, blocked) = RULES.iter().fold(
        (*heirs, BTreeMap::new()),
        |(working, mut blocked), (blocker, targets)| {
            if !working.is_present(*blocker) {
                return (working, blocked);
            }
            let next = targets
                .iter()
                .filter(|target| working.is_present(**target))
                .fold(working, |acc, target| {
                    blocked.insert(*target, *blocker);
                    acc.without(*target)
                });
            (next, blocked)
        },
    );

    for (category, blocker) in &blocked {
        tracing::debug!(%category, %blocker, "heir blocked");
    }

    Precedence {
        original: *heirs,
        working,
        blocked,
    }
}
