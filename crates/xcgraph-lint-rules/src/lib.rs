//! # xcgraph-lint-rules
//!
//! Built-in rules for xcgraph-lint.
//!
//! Project rules run once per project; graph rules run once over the whole
//! resolved graph. Rules checking both scopes implement both traits under a
//! single name, so one configuration entry controls both.
//!
//! ## Available Rules
//!
//! | Code | Name | Scope | Description |
//! |------|------|-------|-------------|
//! | XG001 | `static-products` | graph | Static products linked into more than one binary |
//! | XG002 | `project-configuration` | project + graph | Configurations, xcconfig files, deployment targets, local packages |
//! | XG003 | `product-compatibility` | project + graph | Product/platform matrix, App Clips, bundle identifier prefixes |
//! | XG004 | `target-integrity` | project | Names, files, and declarations of each target |
//! | XG005 | `precompiled-artifacts` | graph | Frameworks and libraries missing on disk |
//! | XG006 | `duplicate-product-names` | graph | Dependencies sharing a built product name |
//! | XG007 | `scheme-references` | graph | Schemes referencing unknown targets, ambiguous run actions |
//! | XG008 | `code-coverage` | graph | Workspace code coverage targets |
//!
//! ## Usage
//!
//! ```ignore
//! use xcgraph_lint_core::GraphLinter;
//! use xcgraph_lint_rules::{StaticProductLinter, TargetIntegrityLinter};
//!
//! let linter = GraphLinter::builder()
//!     .graph_rule(StaticProductLinter::new())
//!     .project_rule(TargetIntegrityLinter::new())
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod code_coverage;
mod duplicate_product_names;
mod precompiled_artifacts;
mod presets;
mod product_compatibility;
mod project_configuration;
mod scheme_references;
mod static_products;
mod target_integrity;

pub use code_coverage::CodeCoverageLinter;
pub use duplicate_product_names::DuplicateProductNamesLinter;
pub use precompiled_artifacts::PrecompiledArtifactsLinter;
pub use presets::{
    all_rules, minimal_rules, recommended_rules, rule_infos, Preset, RuleInfo, RuleSet,
};
pub use product_compatibility::{is_supported_dependency, ProductCompatibilityLinter};
pub use project_configuration::ProjectConfigurationLinter;
pub use scheme_references::SchemeReferencesLinter;
pub use static_products::StaticProductLinter;
pub use target_integrity::TargetIntegrityLinter;

/// Re-export core types for convenience.
pub use xcgraph_lint_core::{GraphRule, LintingIssue, ProjectRule, Severity};
