//! The allocation pipeline.
//!
//! `allocate` validates its input, then runs the four phases in order.
//! Each phase takes the previous phase's value by reference and returns a
//! new one; nothing is mutated across phases and nothing outlives the call.

use crate::allocation::{Allocation, AllocationEntry, Basis, NoShareReason, ResiduaryKind};
use crate::correction::{self, Balanced};
use crate::error::FaraidError;
use crate::fixed::{self, FixedShare, FixedShares};
use crate::heir::{HeirCategory, HeirRecord, Heirs};
use crate::precedence::{self, Precedence};
use crate::residuary::{self, Residue};
use std::collections::BTreeMap;

/// Compute the allocation of `net_estate` among the heirs in `record`.
///
/// Returns exactly one entry per category present in `record`. A zero
/// estate is not an error: every present heir gets a zero entry noted
/// "estate insufficient".
pub fn allocate(net_estate: f64, record: &HeirRecord) -> Result<Allocation, FaraidError> {
    if !net_estate.is_finite() {
        return Err(FaraidError::NonFiniteEstate);
    }
    if net_estate < 0.0 {
        return Err(FaraidError::NegativeEstate(net_estate));
    }
    let heirs = record.validate()?;

    if net_estate <= 0.0 {
        tracing::debug!(heirs = heirs.present().len(), "estate insufficient");
        return Ok(insufficient(net_estate, &heirs));
    }

    let precedence = precedence::resolve(&heirs);
    let fixed = fixed::assign(&precedence, net_estate);
    let residue = residuary::distribute(&precedence, &fixed);
    let balanced = correction::balance(&fixed, &residue);

    Ok(assemble(&precedence, &fixed, &residue, &balanced))
}

fn insufficient(net_estate: f64, heirs: &Heirs) -> Allocation {
    let entries = heirs
        .present()
        .into_iter()
        .map(|category| {
            (
                category,
                AllocationEntry {
                    category,
                    members: heirs.count(category),
                    amount: 0.0,
                    basis: Basis::InsufficientEstate,
                    correction: None,
                    note: "estate insufficient".to_string(),
                    is_blocked: false,
                },
            )
        })
        .collect();
    Allocation {
        net_estate,
        entries,
        correction: None,
        unallocated: 0.0,
    }
}

fn assemble(
    precedence: &Precedence,
    fixed: &FixedShares,
    residue: &Residue,
    balanced: &Balanced,
) -> Allocation {
    let original = &precedence.original;
    let mut entries = BTreeMap::new();

    for category in original.present() {
        let members = original.count(category);

        if let Some(blocker) = precedence.blocker_of(category) {
            entries.insert(
                category,
                AllocationEntry {
                    category,
                    members,
                    amount: 0.0,
                    basis: Basis::Blocked { by: blocker },
                    correction: None,
                    note: format!("blocked by {blocker}"),
                    is_blocked: true,
                },
            );
            continue;
        }

        let fixed_share = fixed.get(category);
        let residue_kind = residue.get(category).map(|r| r.kind);
        let basis = match (fixed_share, residue_kind) {
            (Some(share), None) if share.umariyyatain => Basis::Umariyyatain {
                fraction: share.fraction,
            },
            (Some(share), None) => Basis::FixedShare {
                fraction: share.fraction,
            },
            (Some(share), Some(kind)) => Basis::FixedShareAndResiduary {
                fraction: share.fraction,
                residuary: kind,
            },
            (None, Some(kind)) => Basis::Residuary { residuary: kind },
            (None, None) => Basis::NoShare {
                reason: no_share_reason(category, &precedence.working, residue),
            },
        };

        let correction = balanced
            .affected
            .contains(&category)
            .then_some(balanced.correction)
            .flatten();
        let mut note = describe(&basis, fixed_share, residue.pool);
        if let Some(correction) = correction {
            note.push(' ');
            note.push_str(correction.note_suffix());
        }

        entries.insert(
            category,
            AllocationEntry {
                category,
                members,
                amount: balanced.amounts.get(&category).copied().unwrap_or(0.0).max(0.0),
                basis,
                correction,
                note,
                is_blocked: false,
            },
        );
    }

    Allocation {
        net_estate: fixed.net_estate,
        entries,
        correction: balanced.correction,
        unallocated: balanced.unallocated,
    }
}

fn no_share_reason(category: HeirCategory, working: &Heirs, residue: &Residue) -> NoShareReason {
    if category == HeirCategory::GranddaughtersThroughSon && working.daughters >= 2 {
        return NoShareReason::TwoThirdsExhausted;
    }
    match &residue.group {
        Some(group) => NoShareReason::ResidueTakenBy {
            category: group.leader(),
        },
        None => NoShareReason::NoApplicableRule,
    }
}

fn describe(basis: &Basis, fixed_share: Option<&FixedShare>, pool: f64) -> String {
    match basis {
        Basis::FixedShare { fraction } => {
            let share = fixed_share.copied();
            match share {
                Some(share) if share.completes_two_thirds => format!(
                    "fixed share of {fraction}, completing two-thirds with the daughter (takmilah)"
                ),
                Some(share) if share.members > 1 => format!(
                    "fixed share of {fraction} split among {} ({} each)",
                    share.members,
                    share.per_member_fraction()
                ),
                _ => format!("fixed share of {fraction}"),
            }
        }
        Basis::Umariyyatain { .. } => {
            "Umariyyatain: one third of what remains after the spouse's share".to_string()
        }
        Basis::Residuary { residuary } => residuary_note(*residuary, pool),
        Basis::FixedShareAndResiduary {
            fraction,
            residuary,
        } => format!(
            "fixed share of {fraction} plus the residue ({})",
            residuary.term()
        ),
        Basis::Blocked { by } => format!("blocked by {by}"),
        Basis::NoShare { reason } => match reason {
            NoShareReason::ResidueTakenBy { category } => {
                format!("no fixed share; the residue goes to {category}")
            }
            NoShareReason::TwoThirdsExhausted => {
                "no share; the daughters' two-thirds is already complete".to_string()
            }
            NoShareReason::NoApplicableRule => "no applicable share".to_string(),
        },
        Basis::InsufficientEstate => "estate insufficient".to_string(),
    }
}

fn residuary_note(kind: ResiduaryKind, pool: f64) -> String {
    if pool > 0.0 {
        format!("{}: takes the residue", kind.term())
    } else {
        format!("{}: nothing remained after the fixed shares", kind.term())
    }
}

impl Allocation {
    /// Whether the allocation conserves the estate within tolerance.
    pub fn is_balanced(&self) -> bool {
        (self.total_allocated() + self.unallocated - self.net_estate).abs()
            <= correction::tolerance(self.net_estate)
    }
}
