//! Case files: the two engine inputs plus the estate breakdown they come
//! from.
//!
//! ```toml
//! deceased = "male"
//!
//! [estate]
//! gross = 1000000000
//! debts = 50000000
//! bequests = 10000000
//!
//! [heirs]
//! wife = true
//! sons = 1
//! ```
//!
//! `[estate]` holds either `net` or the `gross` breakdown. Net estate is
//! computed here, before the engine is called: gross minus debts, funeral
//! costs and bequests, with bequests capped at one third of what debts and
//! funeral costs leave.

use crate::cli::{CaseArgs, Sex};
use faraid_kernel::{HeirCategory, HeirRecord, Presence};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    #[serde(default)]
    pub deceased: Option<Sex>,
    #[serde(default)]
    pub estate: EstateSpec,
    #[serde(default)]
    pub heirs: HeirRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstateSpec {
    pub net: Option<f64>,
    pub gross: Option<f64>,
    #[serde(default)]
    pub debts: f64,
    #[serde(default)]
    pub funeral: f64,
    #[serde(default)]
    pub bequests: f64,
}

/// How a net estate was derived from a gross breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstateBreakdown {
    pub gross: f64,
    pub debts: f64,
    pub funeral: f64,
    pub bequests: f64,
    pub bequest_limit: f64,
    pub net: f64,
}

impl EstateSpec {
    fn has_breakdown_fields(&self) -> bool {
        self.debts != 0.0 || self.funeral != 0.0 || self.bequests != 0.0
    }

    /// Resolve to a net estate, if one is given.
    pub fn resolve(&self) -> Result<Option<(f64, Option<EstateBreakdown>)>, String> {
        match (self.net, self.gross) {
            (Some(_), Some(_)) => Err("set either estate.net or estate.gross, not both".to_string()),
            (Some(_), None) if self.has_breakdown_fields() => Err(
                "estate.debts, estate.funeral and estate.bequests require estate.gross".to_string(),
            ),
            (Some(net), None) => Ok(Some((net, None))),
            (None, Some(gross)) => {
                let breakdown = net_from_gross(gross, self.debts, self.funeral, self.bequests)?;
                Ok(Some((breakdown.net, Some(breakdown))))
            }
            (None, None) if self.has_breakdown_fields() => {
                Err("estate.gross is required with debts, funeral or bequests".to_string())
            }
            (None, None) => Ok(None),
        }
    }
}

pub fn net_from_gross(
    gross: f64,
    debts: f64,
    funeral: f64,
    bequests: f64,
) -> Result<EstateBreakdown, String> {
    if !gross.is_finite() || gross <= 0.0 {
        return Err(format!("gross estate must be greater than zero, got {gross}"));
    }
    for (label, value) in [("debts", debts), ("funeral costs", funeral), ("bequests", bequests)] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{label} must not be negative, got {value}"));
        }
    }

    let after_obligations = gross - debts - funeral;
    let bequest_limit = (after_obligations / 3.0).max(0.0);
    if bequests > bequest_limit {
        return Err(format!(
            "bequests of {bequests} exceed the one-third limit of {bequest_limit}"
        ));
    }

    let net = after_obligations - bequests;
    if net < 0.0 {
        tracing::warn!(gross, debts, funeral, "obligations exceed the estate; nothing to distribute");
    }

    Ok(EstateBreakdown {
        gross,
        debts,
        funeral,
        bequests,
        bequest_limit,
        net: net.max(0.0),
    })
}

/// Engine inputs gathered from every source.
#[derive(Debug, Clone)]
pub struct ResolvedCase {
    pub source: Option<PathBuf>,
    pub net_estate: f64,
    pub breakdown: Option<EstateBreakdown>,
    pub deceased: Option<Sex>,
    pub heirs: HeirRecord,
}

pub fn load_case_file(path: &Path) -> Result<CaseFile, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read case file {}: {e}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse case JSON at {}: {e}", path.display()))
    } else {
        toml::from_str(&text)
            .map_err(|e| format!("failed to parse case TOML at {}: {e}", path.display()))
    }
}

pub fn resolve_case(args: &CaseArgs) -> Result<ResolvedCase, String> {
    let source = args.case.as_ref().map(PathBuf::from);
    let file = match &source {
        Some(path) => load_case_file(path)?,
        None => CaseFile::default(),
    };

    let from_file = file.estate.resolve()?;
    let (net_estate, breakdown) = match (args.estate, from_file) {
        (Some(estate), _) => (estate, None),
        (None, Some(resolved)) => resolved,
        (None, None) => {
            return Err("no estate given; pass --estate or set [estate] in a case file".to_string());
        }
    };

    let mut heirs = file.heirs;
    apply_flag_overrides(&mut heirs, args);

    check_single_spouse(&heirs)?;
    let deceased = args.deceased.or(file.deceased);
    if let Some(sex) = deceased {
        check_spouse(sex, &heirs)?;
    }

    tracing::debug!(
        net_estate,
        source = ?source,
        heirs = heirs.iter().count(),
        "case resolved"
    );

    Ok(ResolvedCase {
        source,
        net_estate,
        breakdown,
        deceased,
        heirs,
    })
}

fn apply_flag_overrides(heirs: &mut HeirRecord, args: &CaseArgs) {
    let flags = [
        (HeirCategory::Husband, args.husband),
        (HeirCategory::Wife, args.wife),
        (HeirCategory::Father, args.father),
        (HeirCategory::Mother, args.mother),
        (HeirCategory::PaternalGrandfather, args.grandfather),
        (HeirCategory::PaternalGrandmother, args.grandmother),
    ];
    for (category, set) in flags {
        if set {
            heirs.set(category, Presence::Flag(true));
        }
    }

    let counts = [
        (HeirCategory::Sons, args.sons),
        (HeirCategory::Daughters, args.daughters),
        (HeirCategory::GrandsonsThroughSon, args.grandsons),
        (HeirCategory::GranddaughtersThroughSon, args.granddaughters),
        (HeirCategory::Brothers, args.brothers),
        (HeirCategory::Sisters, args.sisters),
    ];
    for (category, count) in counts {
        if let Some(count) = count {
            heirs.set(category, Presence::Count(i64::from(count)));
        }
    }
}

fn check_single_spouse(heirs: &HeirRecord) -> Result<(), String> {
    let listed = |category| matches!(heirs.get(category), Some(Presence::Flag(true)));
    if listed(HeirCategory::Husband) && listed(HeirCategory::Wife) {
        return Err("a deceased leaves a husband or a wife, not both".to_string());
    }
    Ok(())
}

/// A male deceased leaves a wife, a female deceased a husband.
fn check_spouse(deceased: Sex, heirs: &HeirRecord) -> Result<(), String> {
    let excluded = match deceased {
        Sex::Male => HeirCategory::Husband,
        Sex::Female => HeirCategory::Wife,
    };
    match heirs.get(excluded) {
        Some(Presence::Flag(true)) => Err(format!(
            "a {deceased} deceased cannot leave a {excluded}"
        )),
        _ => Ok(()),
    }
}
