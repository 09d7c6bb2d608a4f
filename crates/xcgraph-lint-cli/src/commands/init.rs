//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# xcgraph-lint configuration
# Place this file next to the resolved graph description.

# "recommended" (all rules) or "minimal" (XG001 to XG004)
preset = "recommended"

# Lowest severity that fails `xcgraph-lint check`: "error" or "warning"
fail_on = "error"

[linter]
# Resource bundle accessors are not generated
disable_bundle_accessors = false

# Run independent rules on a thread pool
parallel = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.static-products]
enabled = true
# severity = "error"  # Override default severity

[rules.duplicate-product-names]
enabled = true

# [rules.precompiled-artifacts]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("xcgraph-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created xcgraph-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit xcgraph-lint.toml to configure rules");
    println!("  2. Run: xcgraph-lint check <graph.json>");

    Ok(())
}
