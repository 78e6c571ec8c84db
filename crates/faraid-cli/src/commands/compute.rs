use crate::case::ResolvedCase;
use crate::cli::CaseArgs;
use crate::support::{
    allocate_or_exit, format_amount, has_unallocated, print_json_or_exit, resolve_case_or_exit,
};
use faraid_kernel::{Allocation, AllocationEntry};
use serde_json::{Value, json};
use std::fmt::Write;

pub fn run(args: CaseArgs, json_output: bool) {
    let case = resolve_case_or_exit(&args);
    let allocation = allocate_or_exit(&case);

    if json_output {
        print_json_or_exit(&payload(&case, &allocation), "compute");
    } else {
        print!("{}", render(&case, &allocation));
    }
}

pub fn payload(case: &ResolvedCase, allocation: &Allocation) -> Value {
    let mut payload = allocation.to_json();
    payload["source"] = json!(case.source.as_ref().map(|p| p.display().to_string()));
    payload["deceased"] = json!(case.deceased.map(|s| s.to_string()));
    payload["estate_breakdown"] = json!(case.breakdown);
    payload
}

pub fn entry_heading(entry: &AllocationEntry) -> String {
    if entry.category.is_singleton() {
        entry.category.label().to_string()
    } else {
        format!("{} ({})", entry.category.label(), entry.members)
    }
}

pub fn render(case: &ResolvedCase, allocation: &Allocation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "faraid compute");
    if let Some(source) = &case.source {
        let _ = writeln!(out, "  Source: {}", source.display());
    }
    if let Some(breakdown) = &case.breakdown {
        let _ = writeln!(out, "  Gross estate: {}", format_amount(breakdown.gross));
        let _ = writeln!(out, "  Debts: {}", format_amount(breakdown.debts));
        let _ = writeln!(out, "  Funeral costs: {}", format_amount(breakdown.funeral));
        let _ = writeln!(
            out,
            "  Bequests: {} (limit {})",
            format_amount(breakdown.bequests),
            format_amount(breakdown.bequest_limit)
        );
    }
    let _ = writeln!(out, "  Net estate: {}", format_amount(allocation.net_estate));

    if allocation.entries.is_empty() {
        let _ = writeln!(out, "  No heirs entered; nothing is distributed.");
    } else {
        let _ = writeln!(out, "  Shares:");
        for entry in allocation.entries.values() {
            let _ = writeln!(
                out,
                "    {:<34} {:>18}  [{}] {}",
                entry_heading(entry),
                format_amount(entry.amount),
                entry.basis_label(),
                entry.note
            );
            if entry.members > 1 && entry.amount > 0.0 {
                let _ = writeln!(
                    out,
                    "      per member: {}",
                    format_amount(entry.per_member())
                );
            }
        }
    }

    let _ = writeln!(
        out,
        "  Total allocated: {}",
        format_amount(allocation.total_allocated())
    );
    if let Some(correction) = allocation.correction {
        let _ = writeln!(
            out,
            "  Correction: {} {}",
            correction.term(),
            correction.note_suffix()
        );
    }
    if has_unallocated(allocation) {
        let _ = writeln!(
            out,
            "  Unallocated: {} (no residuary heir and no heir eligible for return; \
             it may go to the public treasury depending on the school)",
            format_amount(allocation.unallocated)
        );
    }
    out
}
