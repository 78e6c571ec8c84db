//! Whole-engine properties over an exhaustive grid of small heir records.
//!
//! Spouse ∈ {none, husband, wife}, every other singleton on/off, every
//! count in 0..=2.

use faraid_kernel::correction::tolerance;
use faraid_kernel::{HeirCategory, HeirRecord, allocate};
use std::collections::BTreeSet;

const ESTATES: [f64; 3] = [1.0, 1200.0, 987_654.321];

const FLAGS: [HeirCategory; 4] = [
    HeirCategory::Father,
    HeirCategory::Mother,
    HeirCategory::PaternalGrandfather,
    HeirCategory::PaternalGrandmother,
];

const COUNTS: [HeirCategory; 6] = [
    HeirCategory::Sons,
    HeirCategory::Daughters,
    HeirCategory::GrandsonsThroughSon,
    HeirCategory::GranddaughtersThroughSon,
    HeirCategory::Brothers,
    HeirCategory::Sisters,
];

fn grid() -> Vec<HeirRecord> {
    let mut records = Vec::new();
    for spouse in [None, Some(HeirCategory::Husband), Some(HeirCategory::Wife)] {
        for flag_bits in 0u32..(1 << FLAGS.len()) {
            for count_code in 0u32..3u32.pow(COUNTS.len() as u32) {
                let mut record = HeirRecord::new();
                if let Some(spouse) = spouse {
                    record = record.with_flag(spouse, true);
                }
                for (i, category) in FLAGS.iter().enumerate() {
                    if flag_bits & (1 << i) != 0 {
                        record = record.with_flag(*category, true);
                    }
                }
                let mut code = count_code;
                for category in COUNTS {
                    let count = i64::from(code % 3);
                    code /= 3;
                    if count > 0 {
                        record = record.with_count(category, count);
                    }
                }
                records.push(record);
            }
        }
    }
    records
}

fn present_keys(record: &HeirRecord) -> BTreeSet<HeirCategory> {
    record
        .validate()
        .expect("grid records are valid")
        .present()
        .into_iter()
        .collect()
}

#[test]
fn conservation_and_non_negativity() {
    for estate in ESTATES {
        for record in grid() {
            let allocation = allocate(estate, &record).expect("valid input");
            for entry in allocation.entries.values() {
                assert!(
                    entry.amount >= 0.0,
                    "negative amount for {} in {record:?}",
                    entry.category
                );
            }
            assert!(allocation.unallocated >= 0.0, "{record:?}");
            assert!(
                allocation.is_balanced(),
                "estate not conserved for {record:?}: total {} + unallocated {} vs {estate}",
                allocation.total_allocated(),
                allocation.unallocated
            );
            if allocation.unallocated == 0.0 {
                assert!(
                    (allocation.total_allocated() - estate).abs() <= tolerance(estate),
                    "{record:?}"
                );
            }
        }
    }
}

#[test]
fn residuary_heirs_leave_nothing_unallocated() {
    for record in grid() {
        let allocation = allocate(1200.0, &record).expect("valid input");
        if allocation.residuaries().next().is_some() {
            assert_eq!(allocation.unallocated, 0.0, "{record:?}");
            assert!(
                (allocation.total_allocated() - 1200.0).abs() <= tolerance(1200.0),
                "{record:?}"
            );
        }
    }
}

#[test]
fn presence_coverage() {
    for record in grid() {
        let allocation = allocate(1200.0, &record).expect("valid input");
        let keys: BTreeSet<HeirCategory> = allocation.entries.keys().copied().collect();
        assert_eq!(keys, present_keys(&record), "{record:?}");
    }
}

#[test]
fn idempotence() {
    for record in grid().into_iter().step_by(7) {
        let first = allocate(1200.0, &record).expect("valid input");
        let second = allocate(1200.0, &record).expect("valid input");
        assert_eq!(first, second);
    }
}

#[test]
fn blocking_completeness() {
    for record in grid() {
        let heirs = record.validate().expect("valid");
        let allocation = allocate(1200.0, &record).expect("valid input");
        let must_block: Vec<HeirCategory> = [
            (heirs.father, HeirCategory::PaternalGrandfather),
            (heirs.father, HeirCategory::Brothers),
            (heirs.father, HeirCategory::Sisters),
            (heirs.mother, HeirCategory::PaternalGrandmother),
            (heirs.sons > 0, HeirCategory::GrandsonsThroughSon),
            (heirs.sons > 0, HeirCategory::GranddaughtersThroughSon),
            (heirs.sons > 0, HeirCategory::Brothers),
            (heirs.sons > 0, HeirCategory::Sisters),
        ]
        .into_iter()
        .filter(|(blocker_present, category)| *blocker_present && heirs.is_present(*category))
        .map(|(_, category)| category)
        .collect();

        for category in must_block {
            let entry = allocation.get(category).expect("blocked heirs keep an entry");
            assert!(entry.is_blocked, "{category} should be blocked in {record:?}");
            assert_eq!(entry.amount, 0.0);
        }
        for entry in allocation.blocked() {
            assert_eq!(entry.amount, 0.0);
        }
    }
}

#[test]
fn zero_estate_gives_every_present_heir_a_zero_entry() {
    for record in grid().into_iter().step_by(11) {
        let allocation = allocate(0.0, &record).expect("zero estate is valid");
        assert_eq!(allocation.entries.len(), present_keys(&record).len());
        assert!(
            allocation
                .entries
                .values()
                .all(|e| e.amount == 0.0 && e.note == "estate insufficient")
        );
    }
}

#[test]
fn concurrent_callers_agree() {
    let record = HeirRecord::new()
        .with_flag(HeirCategory::Husband, true)
        .with_count(HeirCategory::Daughters, 2)
        .with_flag(HeirCategory::Mother, true);
    let expected = allocate(1200.0, &record).expect("valid input");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let record = record.clone();
            std::thread::spawn(move || allocate(1200.0, &record).expect("valid input"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread should finish"), expected);
    }
}
