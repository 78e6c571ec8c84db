use crate::cli::CaseArgs;
use crate::support::{
    allocate_or_exit, has_unallocated, print_json_or_exit, print_list_block,
    resolve_case_or_exit, yes_no,
};
use faraid_kernel::{Allocation, Basis};
use serde_json::{Value, json};

pub fn run(args: CaseArgs, json_output: bool) {
    let case = resolve_case_or_exit(&args);
    let allocation = allocate_or_exit(&case);

    if json_output {
        print_json_or_exit(&payload(&allocation), "explain");
        return;
    }

    println!("faraid explain");
    let blocked = blocked_lines(&allocation);
    let residuary = residuary_lines(&allocation);
    print_list_block("Blocked heirs (hijab)", &blocked);
    print_list_block("Residuary heirs ('aṣabah)", &residuary);
    if blocked.is_empty() && residuary.is_empty() {
        println!("  Every present heir takes a fixed share; none is blocked or residuary.");
    }
    if let Some(correction) = allocation.correction {
        println!("  Correction: {} {}", correction.term(), correction.note_suffix());
    }
    println!("  Fully allocated: {}", yes_no(!has_unallocated(&allocation)));
}

pub fn blocked_lines(allocation: &Allocation) -> Vec<String> {
    allocation
        .blocked()
        .filter_map(|entry| match entry.basis {
            Basis::Blocked { by } => Some(format!(
                "{}: blocked by {}",
                entry.category.label(),
                by.label().to_lowercase()
            )),
            _ => None,
        })
        .collect()
}

pub fn residuary_lines(allocation: &Allocation) -> Vec<String> {
    allocation
        .residuaries()
        .filter_map(|entry| {
            entry.basis.residuary().map(|kind| {
                format!(
                    "{}: {} ({})",
                    entry.category.label(),
                    kind.term(),
                    kind.label()
                )
            })
        })
        .collect()
}

pub fn payload(allocation: &Allocation) -> Value {
    let blocked: Vec<Value> = allocation
        .blocked()
        .filter_map(|entry| match entry.basis {
            Basis::Blocked { by } => Some(json!({
                "category": entry.category,
                "blocked_by": by,
            })),
            _ => None,
        })
        .collect();
    let residuary: Vec<Value> = allocation
        .residuaries()
        .filter_map(|entry| {
            entry.basis.residuary().map(|kind| {
                json!({
                    "category": entry.category,
                    "kind": kind,
                    "term": kind.term(),
                    "amount": entry.amount,
                })
            })
        })
        .collect();

    json!({
        "blocked": blocked,
        "residuary": residuary,
        "correction": allocation.correction,
        "unallocated": allocation.unallocated,
    })
}
