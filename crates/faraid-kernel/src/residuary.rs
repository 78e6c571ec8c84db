//! Phase 3: residuary distribution ('aṣabah).
//!
//! The first candidate group whose leader is present takes whatever the
//! fixed shares left, split by `members × weight`:
//!
//! ```text
//! 1. sons                 {sons: 2, daughters: 1}
//! 2. grandsons            {grandsons: 2, granddaughters: 1}
//! 3. brothers             {brothers: 2, sisters: 1}
//! 4. father               {father: 1}          no male descendant
//! 5. sisters with female  {sisters: 1}         no brothers
//!    descendants
//! 6. paternal grandfather {grandfather: 1}     no father, no male descendant
//! ```
//!
//! Residue is added on top of any fixed share the heir already holds.

use crate::allocation::ResiduaryKind;
use crate::fixed::FixedShares;
use crate::heir::{HeirCategory, Heirs};
use crate::precedence::Precedence;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResiduaryMember {
    pub category: HeirCategory,
    pub weight: u32,
    pub kind: ResiduaryKind,
}

/// The active residuary group. At most one per computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResiduaryGroup {
    pub members: Vec<ResiduaryMember>,
}

impl ResiduaryGroup {
    fn male_led(leader: HeirCategory, peer: HeirCategory) -> Self {
        Self {
            members: vec![
                ResiduaryMember {
                    category: leader,
                    weight: 2,
                    kind: ResiduaryKind::InOwnRight,
                },
                ResiduaryMember {
                    category: peer,
                    weight: 1,
                    kind: ResiduaryKind::WithMalePeer,
                },
            ],
        }
    }

    fn single(category: HeirCategory, kind: ResiduaryKind) -> Self {
        Self {
            members: vec![ResiduaryMember {
                category,
                weight: 1,
                kind,
            }],
        }
    }

    /// The category whose presence selected this group.
    pub fn leader(&self) -> HeirCategory {
        self.members[0].category
    }

    /// Σ members × weight over the working record.
    pub fn total_weight(&self, heirs: &Heirs) -> u64 {
        self.members
            .iter()
            .map(|m| u64::from(heirs.count(m.category)) * u64::from(m.weight))
            .sum()
    }
}

/// Pick the first matching group from the post-blocking record.
pub fn select_group(heirs: &Heirs) -> Option<ResiduaryGroup> {
    if heirs.sons > 0 {
        return Some(ResiduaryGroup::male_led(
            HeirCategory::Sons,
            HeirCategory::Daughters,
        ));
    }
    if heirs.grandsons > 0 {
        return Some(ResiduaryGroup::male_led(
            HeirCategory::GrandsonsThroughSon,
            HeirCategory::GranddaughtersThroughSon,
        ));
    }
    if heirs.brothers > 0 {
        return Some(ResiduaryGroup::male_led(
            HeirCategory::Brothers,
            HeirCategory::Sisters,
        ));
    }
    if heirs.father && !heirs.has_male_descendant() {
        return Some(ResiduaryGroup::single(
            HeirCategory::Father,
            ResiduaryKind::InOwnRight,
        ));
    }
    if heirs.sisters > 0 && heirs.has_female_descendant() {
        return Some(ResiduaryGroup::single(
            HeirCategory::Sisters,
            ResiduaryKind::AlongsideAnother,
        ));
    }
    if heirs.grandfather && !heirs.father && !heirs.has_male_descendant() {
        return Some(ResiduaryGroup::single(
            HeirCategory::PaternalGrandfather,
            ResiduaryKind::InOwnRight,
        ));
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidueShare {
    pub amount: f64,
    pub kind: ResiduaryKind,
}

/// Output of phase 3.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub group: Option<ResiduaryGroup>,
    /// Remainder after fixed shares, clamped at zero.
    pub pool: f64,
    pub shares: BTreeMap<HeirCategory, ResidueShare>,
    /// The pool when no group matched; zero otherwise.
    pub uncollected: f64,
}

impl Residue {
    pub fn get(&self, category: HeirCategory) -> Option<&ResidueShare> {
        self.shares.get(&category)
    }
}

pub fn distribute(precedence: &Precedence, fixed: &FixedShares) -> Residue {
    let heirs = &precedence.working;
    let pool = fixed.remainder.max(0.0);

    let Some(group) = select_group(heirs) else {
        tracing::debug!(pool, "no residuary group");
        return Residue {
            group: None,
            pool,
            shares: BTreeMap::new(),
            uncollected: pool,
        };
    };

    let total_weight = group.total_weight(heirs);
    let shares: BTreeMap<HeirCategory, ResidueShare> = group
        .members
        .iter()
        .filter(|m| heirs.is_present(m.category) && total_weight > 0)
        .map(|m| {
            let portion = u64::from(heirs.count(m.category)) * u64::from(m.weight);
            let amount = pool * portion as f64 / total_weight as f64;
            (
                m.category,
                ResidueShare {
                    amount,
                    kind: m.kind,
                },
            )
        })
        .collect();

    tracing::debug!(leader = %group.leader(), pool, "residue distributed");

    Residue {
        group: Some(group),
        pool,
        shares,
        uncollected: 0.0,
    }
}
