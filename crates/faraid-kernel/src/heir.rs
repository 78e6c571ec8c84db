//! Heir categories and the heir record.
//!
//! The engine recognises a closed set of twelve relations. Six are
//! singleton relations carried as a boolean flag; six are multi-member
//! relations carried as a count:
//!
//! | key                          | presence |
//! |------------------------------|----------|
//! | `husband`, `wife`            | flag     |
//! | `father`, `mother`           | flag     |
//! | `paternal-grandfather`       | flag     |
//! | `paternal-grandmother`       | flag     |
//! | `sons`, `daughters`          | count    |
//! | `grandsons-through-son`      | count    |
//! | `granddaughters-through-son` | count    |
//! | `brothers`, `sisters`        | count    |
//!
//! Callers build a loosely-typed [`HeirRecord`] (what a form or a case
//! file hands over) and the engine validates it into [`Heirs`], the typed
//! working value every phase reads.

use crate::error::FaraidError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One heir category. Declaration order is the output order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum HeirCategory {
    Husband,
    Wife,
    Father,
    Mother,
    PaternalGrandfather,
    PaternalGrandmother,
    Sons,
    Daughters,
    GrandsonsThroughSon,
    GranddaughtersThroughSon,
    Brothers,
    Sisters,
}

impl HeirCategory {
    pub const ALL: [HeirCategory; 12] = [
        Self::Husband,
        Self::Wife,
        Self::Father,
        Self::Mother,
        Self::PaternalGrandfather,
        Self::PaternalGrandmother,
        Self::Sons,
        Self::Daughters,
        Self::GrandsonsThroughSon,
        Self::GranddaughtersThroughSon,
        Self::Brothers,
        Self::Sisters,
    ];

    /// The mapping key used on every external surface.
    pub fn key(self) -> &'static str {
        match self {
            Self::Husband => "husband",
            Self::Wife => "wife",
            Self::Father => "father",
            Self::Mother => "mother",
            Self::PaternalGrandfather => "paternal-grandfather",
            Self::PaternalGrandmother => "paternal-grandmother",
            Self::Sons => "sons",
            Self::Daughters => "daughters",
            Self::GrandsonsThroughSon => "grandsons-through-son",
            Self::GranddaughtersThroughSon => "granddaughters-through-son",
            Self::Brothers => "brothers",
            Self::Sisters => "sisters",
        }
    }

    /// Human-readable name for rendered output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Husband => "Husband",
            Self::Wife => "Wife",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::PaternalGrandfather => "Paternal grandfather",
            Self::PaternalGrandmother => "Paternal grandmother",
            Self::Sons => "Sons",
            Self::Daughters => "Daughters",
            Self::GrandsonsThroughSon => "Grandsons (through a son)",
            Self::GranddaughtersThroughSon => "Granddaughters (through a son)",
            Self::Brothers => "Full brothers",
            Self::Sisters => "Full sisters",
        }
    }

    /// Singleton relations are carried as a flag, the rest as a count.
    pub fn is_singleton(self) -> bool {
        matches!(
            self,
            Self::Husband
                | Self::Wife
                | Self::Father
                | Self::Mother
                | Self::PaternalGrandfather
                | Self::PaternalGrandmother
        )
    }

    pub fn is_spouse(self) -> bool {
        matches!(self, Self::Husband | Self::Wife)
    }
}

impl std::fmt::Display for HeirCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for HeirCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        if let Some(category) = Self::ALL.iter().find(|c| c.key() == normalized) {
            return Ok(*category);
        }
        match normalized.as_str() {
            "grandfather" => Ok(Self::PaternalGrandfather),
            "grandmother" => Ok(Self::PaternalGrandmother),
            "son" => Ok(Self::Sons),
            "daughter" => Ok(Self::Daughters),
            "grandsons" | "grandson" => Ok(Self::GrandsonsThroughSon),
            "granddaughters" | "granddaughter" => Ok(Self::GranddaughtersThroughSon),
            "brother" | "full-brothers" => Ok(Self::Brothers),
            "sister" | "full-sisters" => Ok(Self::Sisters),
            _ => Err(format!("unknown heir category: {s}")),
        }
    }
}

/// Raw presence value as supplied by a caller.
///
/// Kept deliberately loose so a decoded record can carry a wrong shape or
/// a negative count all the way to [`HeirRecord::validate`], which is the
/// one place that rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Presence {
    Flag(bool),
    Count(i64),
}

impl Presence {
    fn shape(self) -> &'static str {
        match self {
            Self::Flag(_) => "a boolean flag",
            Self::Count(_) => "a member count",
        }
    }
}

/// The engine's primary input: category → presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeirRecord {
    entries: BTreeMap<HeirCategory, Presence>,
}

impl HeirRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, category: HeirCategory, present: bool) -> Self {
        self.set(category, Presence::Flag(present));
        self
    }

    pub fn with_count(mut self, category: HeirCategory, count: i64) -> Self {
        self.set(category, Presence::Count(count));
        self
    }

    pub fn set(&mut self, category: HeirCategory, presence: Presence) {
        self.entries.insert(category, presence);
    }

    pub fn get(&self, category: HeirCategory) -> Option<Presence> {
        self.entries.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HeirCategory, Presence)> + '_ {
        self.entries.iter().map(|(c, p)| (*c, *p))
    }

    /// Check shapes and signs, producing the typed working record.
    pub fn validate(&self) -> Result<Heirs, FaraidError> {
        let mut heirs = Heirs::default();
        for (category, presence) in self.iter() {
            match (category.is_singleton(), presence) {
                (true, Presence::Flag(flag)) => heirs.set_flag(category, flag),
                (false, Presence::Count(count)) => {
                    if count < 0 {
                        return Err(FaraidError::NegativeCount { category, count });
                    }
                    let members = u32::try_from(count)
                        .map_err(|_| FaraidError::CountOutOfRange { category, count })?;
                    heirs.set_count(category, members);
                }
                (singleton, other) => {
                    return Err(FaraidError::PresenceMismatch {
                        category,
                        expected: if singleton {
                            "a boolean flag"
                        } else {
                            "a member count"
                        },
                        actual: other.shape(),
                    });
                }
            }
        }
        Ok(heirs)
    }
}

/// Validated, typed heir record.
///
/// Phases never mutate one of these; blocking produces a fresh copy with
/// the excluded categories cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Heirs {
    pub husband: bool,
    pub wife: bool,
    pub father: bool,
    pub mother: bool,
    pub grandfather: bool,
    pub grandmother: bool,
    pub sons: u32,
    pub daughters: u32,
    pub grandsons: u32,
    pub granddaughters: u32,
    pub brothers: u32,
    pub sisters: u32,
}

impl Heirs {
    /// Member count for a category; singletons count as 0 or 1.
    pub fn count(&self, category: HeirCategory) -> u32 {
        match category {
            HeirCategory::Husband => u32::from(self.husband),
            HeirCategory::Wife => u32::from(self.wife),
            HeirCategory::Father => u32::from(self.father),
            HeirCategory::Mother => u32::from(self.mother),
            HeirCategory::PaternalGrandfather => u32::from(self.grandfather),
            HeirCategory::PaternalGrandmother => u32::from(self.grandmother),
            HeirCategory::Sons => self.sons,
            HeirCategory::Daughters => self.daughters,
            HeirCategory::GrandsonsThroughSon => self.grandsons,
            HeirCategory::GranddaughtersThroughSon => self.granddaughters,
            HeirCategory::Brothers => self.brothers,
            HeirCategory::Sisters => self.sisters,
        }
    }

    pub fn is_present(&self, category: HeirCategory) -> bool {
        self.count(category) > 0
    }

    /// Present categories in output order.
    pub fn present(&self) -> Vec<HeirCategory> {
        HeirCategory::ALL
            .into_iter()
            .filter(|c| self.is_present(*c))
            .collect()
    }

    /// Copy of this record with `category` cleared.
    pub fn without(&self, category: HeirCategory) -> Heirs {
        let mut next = *self;
        if category.is_singleton() {
            next.set_flag(category, false);
        } else {
            next.set_count(category, 0);
        }
        next
    }

    pub fn has_descendant(&self) -> bool {
        self.sons > 0 || self.daughters > 0 || self.grandsons > 0 || self.granddaughters > 0
    }

    pub fn has_male_descendant(&self) -> bool {
        self.sons > 0 || self.grandsons > 0
    }

    pub fn has_female_descendant(&self) -> bool {
        self.daughters > 0 || self.granddaughters > 0
    }

    pub fn sibling_count(&self) -> u32 {
        self.brothers.saturating_add(self.sisters)
    }

    pub fn has_spouse(&self) -> bool {
        self.husband || self.wife
    }

    fn set_flag(&mut self, category: HeirCategory, flag: bool) {
        match category {
            HeirCategory::Husband => self.husband = flag,
            HeirCategory::Wife => self.wife = flag,
            HeirCategory::Father => self.father = flag,
            HeirCategory::Mother => self.mother = flag,
            HeirCategory::PaternalGrandfather => self.grandfather = flag,
            HeirCategory::PaternalGrandmother => self.grandmother = flag,
            _ => {}
        }
    }

    fn set_count(&mut self, category: HeirCategory, count: u32) {
        match category {
            HeirCategory::Sons => self.sons = count,
            HeirCategory::Daughters => self.daughters = count,
            HeirCategory::GrandsonsThroughSon => self.grandsons = count,
            HeirCategory::GranddaughtersThroughSon => self.granddaughters = count,
            HeirCategory::Brothers => self.brothers = count,
            HeirCategory::Sisters => self.sisters = count,
            _ => {}
        }
    }
}
