//! Phase 4: balance correction ('aul and radd).
//!
//! - 'Aul: assigned amounts exceed the estate; every amount is scaled by
//!   `estate / sum`.
//! - Radd: a remainder is left and no residuary group matched; it is
//!   returned to the non-spouse fixed-share heirs in proportion to their
//!   fractions. Spouses stay at their fixed share. With no eligible heir
//!   the remainder is reported as unallocated.
//!
//! The two cases cannot both apply.

use crate::allocation::Correction;
use crate::fixed::FixedShares;
use crate::heir::HeirCategory;
use crate::residuary::Residue;
use std::collections::{BTreeMap, BTreeSet};

/// Relative tolerance for comparing sums against the net estate.
pub const EPSILON: f64 = 1e-6;

/// Output of phase 4.
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced {
    /// Final amount per receiving category (fixed + residue, corrected).
    pub amounts: BTreeMap<HeirCategory, f64>,
    pub correction: Option<Correction>,
    /// Categories whose amount the correction changed.
    pub affected: BTreeSet<HeirCategory>,
    pub unallocated: f64,
}

pub fn tolerance(net_estate: f64) -> f64 {
    EPSILON * net_estate.abs().max(1.0)
}

pub fn balance(fixed: &FixedShares, residue: &Residue) -> Balanced {
    let net_estate = fixed.net_estate;
    let tolerance = tolerance(net_estate);

    let mut amounts: BTreeMap<HeirCategory, f64> = fixed
        .shares
        .iter()
        .map(|(category, share)| (*category, share.amount))
        .collect();
    for (category, share) in &residue.shares {
        *amounts.entry(*category).or_insert(0.0) += share.amount;
    }

    let sum: f64 = amounts.values().sum();
    if sum > net_estate + tolerance {
        let factor = net_estate / sum;
        let affected = amounts
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(category, _)| *category)
            .collect();
        let amounts = amounts
            .into_iter()
            .map(|(category, amount)| (category, amount * factor))
            .collect();
        tracing::debug!(sum, net_estate, factor, "shares reduced ('aul)");
        return Balanced {
            amounts,
            correction: Some(Correction::Aul),
            affected,
            unallocated: 0.0,
        };
    }

    if residue.group.is_some() || residue.uncollected <= tolerance {
        return Balanced {
            amounts,
            correction: None,
            affected: BTreeSet::new(),
            unallocated: if residue.group.is_some() {
                0.0
            } else {
                residue.uncollected
            },
        };
    }

    let eligible: Vec<(HeirCategory, f64)> = fixed
        .shares
        .iter()
        .filter(|(category, share)| !category.is_spouse() && share.fraction.value() > 0.0)
        .map(|(category, share)| (*category, share.fraction.value()))
        .collect();
    let weight: f64 = eligible.iter().map(|(_, w)| w).sum();

    if eligible.is_empty() || weight <= 0.0 {
        tracing::debug!(
            remainder = residue.uncollected,
            "remainder left unallocated"
        );
        return Balanced {
            amounts,
            correction: None,
            affected: BTreeSet::new(),
            unallocated: residue.uncollected,
        };
    }

    for (category, w) in &eligible {
        if let Some(amount) = amounts.get_mut(category) {
            *amount += residue.uncollected * w / weight;
        }
    }
    tracing::debug!(
        remainder = residue.uncollected,
        recipients = eligible.len(),
        "remainder returned (radd)"
    );

    Balanced {
        amounts,
        correction: Some(Correction::Radd),
        affected: eligible.into_iter().map(|(category, _)| category).collect(),
        unallocated: 0.0,
    }
}
