use crate::case::{ResolvedCase, resolve_case};
use crate::cli::CaseArgs;
use faraid_kernel::{Allocation, allocate};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Remainders at or below this are not reported as unallocated.
const UNALLOCATED_DISPLAY_THRESHOLD: f64 = 0.01;
pub const LOG_ENV: &str = "FARAID_LOG";

pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn resolve_case_or_exit(args: &CaseArgs) -> ResolvedCase {
    resolve_case(args).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn allocate_or_exit(case: &ResolvedCase) -> Allocation {
    allocate(case.net_estate, &case.heirs).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Whether a remainder is large enough to report; float noise is not.
pub fn has_unallocated(allocation: &Allocation) -> bool {
    allocation.unallocated > UNALLOCATED_DISPLAY_THRESHOLD
}

pub fn print_json_or_exit(payload: &Value, label: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {label} json: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

/// Two decimals with comma thousands separators, e.g. `1,234,567.89`.
pub fn format_amount(amount: f64) -> String {
    let rounded = format!("{:.2}", amount.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && rounded != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

pub fn print_list_block(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {header}:");
    for item in items {
        println!("    - {item}");
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
