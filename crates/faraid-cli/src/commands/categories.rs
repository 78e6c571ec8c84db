use crate::support::print_json_or_exit;
use faraid_kernel::HeirCategory;
use serde_json::{Value, json};

pub fn run(json_output: bool) {
    if json_output {
        let rows: Vec<Value> = HeirCategory::ALL
            .iter()
            .map(|category| {
                json!({
                    "key": category.key(),
                    "label": category.label(),
                    "presence": presence_kind(*category),
                    "spouse": category.is_spouse(),
                })
            })
            .collect();
        print_json_or_exit(&json!({ "categories": rows }), "categories");
        return;
    }

    println!("faraid categories");
    for category in HeirCategory::ALL {
        println!(
            "  {:<28} {:<6} {}",
            category.key(),
            presence_kind(category),
            category.label()
        );
    }
}

fn presence_kind(category: HeirCategory) -> &'static str {
    if category.is_singleton() {
        "flag"
    } else {
        "count"
    }
}
