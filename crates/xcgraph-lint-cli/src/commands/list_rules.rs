//! List rules command implementation.

use xcgraph_lint::rules::{rule_infos, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<26} {:<16} Description", "Code", "Name", "Scope");
    println!("{}", "-".repeat(90));

    for info in rule_infos() {
        println!(
            "{:<8} {:<26} {:<16} {}",
            info.code, info.name, info.scope, info.description
        );
    }

    println!("\nPresets:");
    for preset in Preset::ALL {
        let rules = preset.rules();
        let mut codes: Vec<&str> = rules
            .graph_rules
            .iter()
            .map(|r| r.code())
            .chain(rules.project_rules.iter().map(|r| r.code()))
            .collect();
        codes.sort_unstable();
        codes.dedup();
        let default = if preset == Preset::Recommended { " (default)" } else { "" };
        println!("  {:<12} - {}{default}", preset.name(), codes.join(", "));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  xcgraph-lint check graph.json --rules static-products,target-integrity");
    println!("  xcgraph-lint check graph.json --rules XG001,XG004");
}
