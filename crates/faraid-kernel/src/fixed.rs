//! Phase 2: fixed shares (fardh).
//!
//! Every fraction here is a fraction of the *net estate*. Multi-member
//! categories hold one fraction for the whole category, split equally.
//!
//! The mother's Umariyyatain share is the one amount that depends on
//! another: with both parents, a spouse, no descendant and fewer than two
//! siblings she takes a third of what the spouse leaves. Spouses are
//! therefore assigned first.

use crate::heir::{HeirCategory, Heirs};
use crate::precedence::Precedence;
use crate::share::Fraction;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedShare {
    /// Share of the net estate for the whole category.
    pub fraction: Fraction,
    pub members: u32,
    pub amount: f64,
    pub umariyyatain: bool,
    /// Granddaughters' sixth completing two-thirds with a single daughter.
    pub completes_two_thirds: bool,
}

impl FixedShare {
    pub fn per_member_fraction(&self) -> Fraction {
        self.fraction.per_member(self.members)
    }
}

/// Output of phase 2.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedShares {
    pub net_estate: f64,
    pub shares: BTreeMap<HeirCategory, FixedShare>,
    /// Net estate minus every fixed amount; negative when shares exceed it.
    pub remainder: f64,
}

impl FixedShares {
    pub fn get(&self, category: HeirCategory) -> Option<&FixedShare> {
        self.shares.get(&category)
    }

    pub fn total(&self) -> f64 {
        self.shares.values().map(|s| s.amount).sum()
    }
}

pub fn assign(precedence: &Precedence, net_estate: f64) -> FixedShares {
    let heirs = &precedence.working;
    let mut shares = BTreeMap::new();

    for (category, fraction) in spouse_fractions(heirs) {
        shares.insert(category, share(heirs, category, fraction, net_estate));
    }

    if heirs.mother {
        let mother = if is_umariyyatain(heirs) {
            let spouses = shares
                .values()
                .map(|s: &FixedShare| s.fraction)
                .fold(Fraction::new(0, 1), Fraction::plus);
            let fraction = third_of_rest(spouses);
            FixedShare {
                fraction,
                members: 1,
                amount: fraction.of(net_estate),
                umariyyatain: true,
                completes_two_thirds: false,
            }
        } else {
            let fraction = if heirs.has_descendant() || heirs.sibling_count() >= 2 {
                Fraction::SIXTH
            } else {
                Fraction::THIRD
            };
            share(heirs, HeirCategory::Mother, fraction, net_estate)
        };
        shares.insert(HeirCategory::Mother, mother);
    }

    for (category, fraction) in other_fractions(heirs) {
        let mut assigned = share(heirs, category, fraction, net_estate);
        assigned.completes_two_thirds =
            category == HeirCategory::GranddaughtersThroughSon && heirs.daughters == 1;
        shares.insert(category, assigned);
    }

    let mut fixed = FixedShares {
        net_estate,
        shares,
        remainder: 0.0,
    };
    let total = fixed.total();
    fixed.remainder = net_estate - total;
    tracing::debug!(
        assigned = fixed.shares.len(),
        total,
        remainder = fixed.remainder,
        "fixed shares assigned"
    );
    fixed
}

/// Both parents, a spouse, no descendant, fewer than two siblings.
pub fn is_umariyyatain(heirs: &Heirs) -> bool {
    heirs.father
        && heirs.mother
        && heirs.has_spouse()
        && !heirs.has_descendant()
        && heirs.sibling_count() < 2
}

fn spouse_fractions(heirs: &Heirs) -> Vec<(HeirCategory, Fraction)> {
    let descendant = heirs.has_descendant();
    let mut out = Vec::new();
    if heirs.husband {
        let fraction = if descendant {
            Fraction::QUARTER
        } else {
            Fraction::HALF
        };
        out.push((HeirCategory::Husband, fraction));
    }
    if heirs.wife {
        let fraction = if descendant {
            Fraction::EIGHTH
        } else {
            Fraction::QUARTER
        };
        out.push((HeirCategory::Wife, fraction));
    }
    out
}

fn other_fractions(heirs: &Heirs) -> Vec<(HeirCategory, Fraction)> {
    let descendant = heirs.has_descendant();
    let mut out = Vec::new();

    if heirs.grandmother && !heirs.mother {
        out.push((HeirCategory::PaternalGrandmother, Fraction::SIXTH));
    }
    if heirs.father && descendant {
        out.push((HeirCategory::Father, Fraction::SIXTH));
    }
    if heirs.grandfather && descendant && !heirs.father {
        out.push((HeirCategory::PaternalGrandfather, Fraction::SIXTH));
    }

    if heirs.sons == 0 {
        if let Some(fraction) = half_or_two_thirds(heirs.daughters) {
            out.push((HeirCategory::Daughters, fraction));
        }
        if heirs.grandsons == 0 && heirs.granddaughters > 0 {
            let fraction = match heirs.daughters {
                0 => half_or_two_thirds(heirs.granddaughters),
                1 => Some(Fraction::SIXTH),
                _ => None,
            };
            if let Some(fraction) = fraction {
                out.push((HeirCategory::GranddaughtersThroughSon, fraction));
            }
        }
    }

    if heirs.sisters > 0
        && heirs.brothers == 0
        && !heirs.father
        && !heirs.grandfather
        && !descendant
    {
        if let Some(fraction) = half_or_two_thirds(heirs.sisters) {
            out.push((HeirCategory::Sisters, fraction));
        }
    }

    out
}

fn half_or_two_thirds(members: u32) -> Option<Fraction> {
    match members {
        0 => None,
        1 => Some(Fraction::HALF),
        _ => Some(Fraction::TWO_THIRDS),
    }
}

/// One third of what the spouse fractions leave, as a fraction of the whole.
fn third_of_rest(spouses: Fraction) -> Fraction {
    let rest = spouses.denominator.saturating_sub(spouses.numerator);
    Fraction::new(rest, spouses.denominator.saturating_mul(3)).reduced()
}

fn share(heirs: &Heirs, category: HeirCategory, fraction: Fraction, net_estate: f64) -> FixedShare {
    FixedShare {
        fraction,
        members: heirs.count(category),
        amount: fraction.of(net_estate),
        umariyyatain: false,
        completes_two_thirds: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precedence::resolve;

    fn fixed(heirs: Heirs, estate: f64) -> FixedShares {
        assign(&resolve(&heirs), estate)
    }

    #[test]
    fn spouse_shares_depend_on_descendants() {
        let with_child = fixed(
            Heirs {
                wife: true,
                sons: 1,
                ..Heirs::default()
            },
            1000.0,
        );
        assert_eq!(with_child.get(HeirCategory::Wife).unwrap().amount, 125.0);
        assert_eq!(with_child.remainder, 875.0);

        let childless = fixed(
            Heirs {
                husband: true,
                ..Heirs::default()
            },
            1000.0,
        );
        assert_eq!(
            childless.get(HeirCategory::Husband).unwrap().fraction,
            Fraction::HALF
        );
    }

    #[test]
    fn mother_third_or_sixth() {
        let alone = fixed(
            Heirs {
                mother: true,
                ..Heirs::default()
            },
            600.0,
        );
        assert_eq!(
            alone.get(HeirCategory::Mother).unwrap().fraction,
            Fraction::THIRD
        );

        let with_siblings = fixed(
            Heirs {
                mother: true,
                brothers: 1,
                sisters: 1,
                ..Heirs::default()
            },
            600.0,
        );
        assert_eq!(
            with_siblings.get(HeirCategory::Mother).unwrap().fraction,
            Fraction::SIXTH
        );
    }

    #[test]
    fn umariyyatain_with_husband() {
        let shares = fixed(
            Heirs {
                husband: true,
                father: true,
                mother: true,
                ..Heirs::default()
            },
            2400.0,
        );
        let mother = shares.get(HeirCategory::Mother).unwrap();
        assert!(mother.umariyyatain);
        assert_eq!(mother.amount, 400.0);
        assert_eq!(mother.fraction, Fraction::SIXTH);
        assert!(shares.get(HeirCategory::Father).is_none());
        assert_eq!(shares.remainder, 800.0);
    }

    #[test]
    fn umariyyatain_with_wife() {
        let shares = fixed(
            Heirs {
                wife: true,
                father: true,
                mother: true,
                ..Heirs::default()
            },
            1200.0,
        );
        let mother = shares.get(HeirCategory::Mother).unwrap();
        assert_eq!(mother.amount, 300.0);
        assert_eq!(mother.fraction, Fraction::QUARTER);
    }

    #[test]
    fn umariyyatain_fraction_matches_amount_with_both_spouses() {
        let shares = fixed(
            Heirs {
                husband: true,
                wife: true,
                father: true,
                mother: true,
                ..Heirs::default()
            },
            2400.0,
        );
        let mother = shares.get(HeirCategory::Mother).unwrap();
        assert_eq!(mother.fraction, Fraction::new(1, 12));
        assert_eq!(mother.amount, 200.0);
        assert_eq!(mother.fraction.of(2400.0), mother.amount);
    }

    #[test]
    fn grandmother_sixth_without_mother() {
        let shares = fixed(
            Heirs {
                grandmother: true,
                sons: 1,
                ..Heirs::default()
            },
            1200.0,
        );
        let grandmother = shares.get(HeirCategory::PaternalGrandmother).unwrap();
        assert_eq!(grandmother.fraction, Fraction::SIXTH);
        assert_eq!(grandmother.amount, 200.0);

        let with_mother = fixed(
            Heirs {
                grandmother: true,
                mother: true,
                ..Heirs::default()
            },
            1200.0,
        );
        assert!(with_mother.get(HeirCategory::PaternalGrandmother).is_none());
    }

    #[test]
    fn single_sister_takes_half() {
        let shares = fixed(
            Heirs {
                husband: true,
                sisters: 1,
                ..Heirs::default()
            },
            1000.0,
        );
        let sister = shares.get(HeirCategory::Sisters).unwrap();
        assert_eq!(sister.fraction, Fraction::HALF);
        assert_eq!(sister.amount, 500.0);
        assert_eq!(shares.remainder, 0.0);
    }

    #[test]
    fn daughters_and_granddaughters() {
        let one = fixed(
            Heirs {
                daughters: 1,
                granddaughters: 2,
                ..Heirs::default()
            },
            600.0,
        );
        assert_eq!(one.get(HeirCategory::Daughters).unwrap().amount, 300.0);
        let gd = one.get(HeirCategory::GranddaughtersThroughSon).unwrap();
        assert_eq!(gd.amount, 100.0);
        assert!(gd.completes_two_thirds);
        assert_eq!(gd.per_member_fraction(), Fraction::new(1, 12));

        let two = fixed(
            Heirs {
                daughters: 2,
                granddaughters: 1,
                ..Heirs::default()
            },
            600.0,
        );
        assert_eq!(two.get(HeirCategory::Daughters).unwrap().amount, 400.0);
        assert!(two.get(HeirCategory::GranddaughtersThroughSon).is_none());
    }

    #[test]
    fn daughters_have_no_fixed_share_beside_sons() {
        let shares = fixed(
            Heirs {
                sons: 1,
                daughters: 2,
                ..Heirs::default()
            },
            900.0,
        );
        assert!(shares.shares.is_empty());
        assert_eq!(shares.remainder, 900.0);
    }

    #[test]
    fn sisters_only_without_ascendant_or_descendant() {
        let alone = fixed(
            Heirs {
                sisters: 2,
                ..Heirs::default()
            },
            900.0,
        );
        assert_eq!(alone.get(HeirCategory::Sisters).unwrap().amount, 600.0);

        let with_grandfather = fixed(
            Heirs {
                sisters: 2,
                grandfather: true,
                ..Heirs::default()
            },
            900.0,
        );
        assert!(with_grandfather.get(HeirCategory::Sisters).is_none());
    }

    #[test]
    fn father_sixth_only_with_descendant() {
        let shares = fixed(
            Heirs {
                father: true,
                daughters: 1,
                ..Heirs::default()
            },
            600.0,
        );
        assert_eq!(shares.get(HeirCategory::Father).unwrap().amount, 100.0);

        let childless = fixed(
            Heirs {
                father: true,
                ..Heirs::default()
            },
            600.0,
        );
        assert!(childless.get(HeirCategory::Father).is_none());
    }
}
