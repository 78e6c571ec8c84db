//! Allocation result types.
//!
//! The engine describes *why* each heir received what it did with a tagged
//! [`Basis`] rather than free text, so a presentation layer can localise
//! or restyle labels without string matching. A human-readable `note` is
//! still carried for direct display.

use crate::heir::HeirCategory;
use crate::share::Fraction;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// How a residuary heir came to take the residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResiduaryKind {
    /// 'Aṣabah bil-Nafs: a male relation inheriting the residue himself.
    InOwnRight,
    /// 'Aṣabah bil-Ghair: a female relation made residuary by her male
    /// peer, taking half his portion.
    WithMalePeer,
    /// 'Aṣabah ma'al-Ghair: sisters taking the residue alongside female
    /// descendants.
    AlongsideAnother,
}

impl ResiduaryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::InOwnRight => "residuary in own right",
            Self::WithMalePeer => "residuary jointly with a male peer",
            Self::AlongsideAnother => "residuary alongside another class",
        }
    }

    pub fn term(self) -> &'static str {
        match self {
            Self::InOwnRight => "'Aṣabah bil-Nafs",
            Self::WithMalePeer => "'Aṣabah bil-Ghair",
            Self::AlongsideAnother => "'Aṣabah ma'al-Ghair",
        }
    }
}

/// Why a present, unblocked heir ended up with nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoShareReason {
    /// No fixed share applies and the residue went to a nearer group.
    ResidueTakenBy { category: HeirCategory },
    /// Two or more daughters already exhaust the two-thirds granddaughters
    /// could otherwise complete.
    TwoThirdsExhausted,
    /// No fixed-share row and no residuary group covers this heir.
    NoApplicableRule,
}

/// The rule that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Basis {
    /// A prescribed fraction of the net estate (for the whole category).
    FixedShare { fraction: Fraction },
    /// The mother's third of what remains after the spouse's share;
    /// `fraction` is the resulting share of the net estate.
    Umariyyatain { fraction: Fraction },
    /// Residue only.
    Residuary { residuary: ResiduaryKind },
    /// A fixed share topped up with the residue.
    FixedShareAndResiduary {
        fraction: Fraction,
        residuary: ResiduaryKind,
    },
    /// Excluded by a nearer heir.
    Blocked { by: HeirCategory },
    /// Present and unblocked, but nothing applies.
    NoShare { reason: NoShareReason },
    /// The net estate was zero.
    InsufficientEstate,
}

impl Basis {
    pub fn label(&self) -> String {
        match self {
            Self::FixedShare { fraction } => fraction.to_string(),
            Self::Umariyyatain { .. } => "1/3 of remainder".to_string(),
            Self::Residuary { residuary } => residuary.label().to_string(),
            Self::FixedShareAndResiduary {
                fraction,
                residuary,
            } => format!("{fraction} + {}", residuary.label()),
            Self::Blocked { .. } => "blocked".to_string(),
            Self::NoShare { .. } => "no share".to_string(),
            Self::InsufficientEstate => "estate insufficient".to_string(),
        }
    }

    /// Fixed fraction of the net estate carried by this basis, if any.
    pub fn fraction(&self) -> Option<Fraction> {
        match self {
            Self::FixedShare { fraction }
            | Self::Umariyyatain { fraction }
            | Self::FixedShareAndResiduary { fraction, .. } => Some(*fraction),
            _ => None,
        }
    }

    pub fn residuary(&self) -> Option<ResiduaryKind> {
        match self {
            Self::Residuary { residuary } | Self::FixedShareAndResiduary { residuary, .. } => {
                Some(*residuary)
            }
            _ => None,
        }
    }
}

/// Balance correction applied after fixed shares and residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    /// Shares exceeded the estate and were reduced pro rata.
    Aul,
    /// A remainder with no residuary heir was returned pro rata.
    Radd,
}

impl Correction {
    pub fn term(self) -> &'static str {
        match self {
            Self::Aul => "'Aul",
            Self::Radd => "Radd",
        }
    }

    pub fn note_suffix(self) -> &'static str {
        match self {
            Self::Aul => "(proportionally reduced)",
            Self::Radd => "(proportionally increased)",
        }
    }
}

/// One output record per present heir category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub category: HeirCategory,
    /// Members in the category as supplied (1 for singleton relations).
    pub members: u32,
    pub amount: f64,
    pub basis: Basis,
    pub correction: Option<Correction>,
    pub note: String,
    pub is_blocked: bool,
}

impl AllocationEntry {
    /// The rendered basis, including any correction marker.
    pub fn basis_label(&self) -> String {
        match self.correction {
            Some(correction) => format!("{} ({})", self.basis.label(), correction.term()),
            None => self.basis.label(),
        }
    }

    /// Amount received by each member of the category.
    pub fn per_member(&self) -> f64 {
        self.amount / f64::from(self.members.max(1))
    }
}

/// The engine's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub net_estate: f64,
    pub entries: BTreeMap<HeirCategory, AllocationEntry>,
    pub correction: Option<Correction>,
    /// Remainder no heir could absorb. Never folded into an entry.
    pub unallocated: f64,
}

impl Allocation {
    pub fn get(&self, category: HeirCategory) -> Option<&AllocationEntry> {
        self.entries.get(&category)
    }

    pub fn total_allocated(&self) -> f64 {
        self.entries.values().map(|e| e.amount).sum()
    }

    pub fn blocked(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.entries.values().filter(|e| e.is_blocked)
    }

    pub fn residuaries(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.entries
            .values()
            .filter(|e| e.basis.residuary().is_some())
    }

    /// Stable JSON payload with rendered labels alongside the tagged basis.
    pub fn to_json(&self) -> Value {
        let entries: serde_json::Map<String, Value> = self
            .entries
            .values()
            .map(|entry| {
                (
                    entry.category.key().to_string(),
                    json!({
                        "members": entry.members,
                        "amount": entry.amount,
                        "per_member": entry.per_member(),
                        "basis": entry.basis,
                        "basis_label": entry.basis_label(),
                        "correction": entry.correction,
                        "note": entry.note,
                        "is_blocked": entry.is_blocked,
                    }),
                )
            })
            .collect();

        json!({
            "net_estate": self.net_estate,
            "total_allocated": self.total_allocated(),
            "unallocated": self.unallocated,
            "correction": self.correction,
            "entries": entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_labels() {
        insta::assert_snapshot!(
            Basis::FixedShare { fraction: Fraction::EIGHTH }.label(),
            @"1/8"
        );
        insta::assert_snapshot!(
            Basis::FixedShareAndResiduary {
                fraction: Fraction::SIXTH,
                residuary: ResiduaryKind::InOwnRight,
            }
            .label(),
            @"1/6 + residuary in own right"
        );
        insta::assert_snapshot!(
            Basis::Residuary { residuary: ResiduaryKind::AlongsideAnother }.label(),
            @"residuary alongside another class"
        );
    }

    #[test]
    fn entry_label_carries_correction() {
        let entry = AllocationEntry {
            category: HeirCategory::Husband,
            members: 1,
            amount: 276.92,
            basis: Basis::FixedShare {
                fraction: Fraction::QUARTER,
            },
            correction: Some(Correction::Aul),
            note: "fixed share (proportionally reduced)".to_string(),
            is_blocked: false,
        };
        assert_eq!(entry.basis_label(), "1/4 ('Aul)");
    }

    #[test]
    fn per_member_splits_amount() {
        let entry = AllocationEntry {
            category: HeirCategory::Daughters,
            members: 2,
            amount: 800.0,
            basis: Basis::FixedShare {
                fraction: Fraction::TWO_THIRDS,
            },
            correction: None,
            note: String::new(),
            is_blocked: false,
        };
        assert_eq!(entry.per_member(), 400.0);
    }

    #[test]
    fn basis_serializes_tagged() {
        let value = serde_json::to_value(Basis::Blocked {
            by: HeirCategory::Father,
        })
        .unwrap();
        assert_eq!(value, json!({"kind": "blocked", "by": "father"}));
    }
}
