//! Rule to validate product types against platforms and each other.
//!
//! # Project checks
//!
//! - The product type is available on the target platform.
//! - Bundles on iOS-family platforms carry resources only.
//! - Libraries and static frameworks cannot carry resources when bundle
//!   accessors are disabled.
//! - App Clips declare an existing entitlements file.
//!
//! # Graph checks
//!
//! - Every target-to-target edge is allowed by the compatibility matrix
//!   (see [`is_supported_dependency`]).
//! - An app embeds at most one App Clip.
//! - Watch apps, watch extensions, and App Clips use their parent's bundle
//!   identifier as prefix.

use tracing::debug;
use xcgraph_lint_core::model::{Platform, Product, Target};
use xcgraph_lint_core::{
    GraphContext, GraphRule, GraphTarget, LintingIssue, ProjectContext, ProjectRule,
};

/// Rule code for product-compatibility.
pub const CODE: &str = "XG003";

/// Rule name for product-compatibility.
pub const NAME: &str = "product-compatibility";

const DESCRIPTION: &str = "Validates product types, platforms, and dependencies between them";

/// Products any target may link or embed as a plain dependency.
const LINKABLE: &[Product] = &[
    Product::StaticLibrary,
    Product::DynamicLibrary,
    Product::Framework,
    Product::StaticFramework,
    Product::Bundle,
];

/// Extensions an app may embed.
const APP_EXTENSIONS: &[Product] = &[
    Product::AppExtension,
    Product::MessagesExtension,
    Product::StickerPackExtension,
    Product::TvTopShelfExtension,
    Product::ExtensionKitExtension,
];

/// Validates product types, platforms, and the edges between products.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductCompatibilityLinter;

impl ProductCompatibilityLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProjectRule for ProductCompatibilityLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check_project(&self, ctx: &ProjectContext<'_>) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        for target in &ctx.project.targets {
            if !target.product.supports(target.platform) {
                issues.push(LintingIssue::error(format!(
                    "'{}' for platform '{}' can't have a product type '{}'",
                    target.name, target.platform, target.product
                )));
            }
            if target.product == Product::Bundle
                && target.platform.is_ios_family()
                && !target.sources.is_empty()
            {
                issues.push(LintingIssue::error(format!(
                    "Target '{}' cannot contain source files. Bundles on platform '{}' only support resources.",
                    target.name, target.platform
                )));
            }
            if ctx.options.disable_bundle_accessors
                && matches!(
                    target.product,
                    Product::StaticLibrary | Product::DynamicLibrary | Product::StaticFramework
                )
                && !target.resources.is_empty()
            {
                issues.push(LintingIssue::error(format!(
                    "Target {} cannot contain resources. For {} targets to support resources, 'Bundle Accessors' feature should be enabled.",
                    target.name, target.product
                )));
            }
            if target.product == Product::AppClip {
                issues.extend(lint_app_clip_entitlements(target, ctx));
            }
        }
        issues
    }
}

impl GraphRule for ProductCompatibilityLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
        let traversal = &ctx.traversal;
        let mut issues = Vec::new();

        for from in traversal.all_targets() {
            let dependencies = traversal.direct_target_dependencies(from.id);

            for to in &dependencies {
                if !is_supported_dependency(from.target, to.target) {
                    debug!("Unsupported edge {} -> {}", from.name(), to.name());
                    issues.push(LintingIssue::error(format!(
                        "Target {} has a dependency with target {} of type {} for platform '{}' which is invalid or not supported yet.",
                        from.name(),
                        to.name(),
                        to.product(),
                        to.target.platform
                    )));
                }
            }

            match from.product() {
                Product::App => {
                    issues.extend(lint_app_clip_count(&from, &dependencies));
                    for child in &dependencies {
                        let relationship = match child.product() {
                            Product::Watch2App => Relationship::WatchApp,
                            Product::AppClip => Relationship::AppClip,
                            _ => continue,
                        };
                        issues.extend(lint_bundle_id_prefix(relationship, child.target, from.target));
                    }
                }
                Product::Watch2App => {
                    for child in &dependencies {
                        if child.product() == Product::Watch2Extension {
                            issues.extend(lint_bundle_id_prefix(
                                Relationship::WatchExtension,
                                child.target,
                                from.target,
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
        issues
    }
}

/// Returns true if a target of `from`'s product and platform may depend on
/// a target of `to`'s.
///
/// Dependencies stay on one platform, except for watch apps embedded in an
/// iOS app and for macOS bundles, which may use and be used by anything.
#[must_use]
pub fn is_supported_dependency(from: &Target, to: &Target) -> bool {
    use Product::{
        App, AppClip, AppExtension, Bundle, CommandLineTool, ExtensionKitExtension,
        StaticFramework, StaticLibrary, SystemExtension, Watch2App, Watch2Extension, Xpc,
    };

    let is_macos_bundle = |t: &Target| t.product == Bundle && t.platform == Platform::MacOs;
    if is_macos_bundle(from) || is_macos_bundle(to) {
        return true;
    }
    if from.platform != to.platform {
        return from.product == App
            && from.platform == Platform::Ios
            && to.platform == Platform::WatchOs
            && matches!(to.product, Watch2App | App);
    }

    let linkable = LINKABLE.contains(&to.product);
    match from.product {
        App => {
            linkable
                || APP_EXTENSIONS.contains(&to.product)
                || matches!(to.product, Watch2App)
                || (from.platform == Platform::Ios && to.product == AppClip)
                || (from.platform == Platform::MacOs
                    && matches!(to.product, Xpc | SystemExtension | CommandLineTool))
        }
        AppClip | Watch2Extension => linkable || to.product == AppExtension,
        Watch2App => to.product == Watch2Extension,
        Product::UnitTests | Product::UiTests => {
            linkable || matches!(to.product, App | AppClip | Watch2App)
        }
        CommandLineTool => matches!(to.product, StaticLibrary | StaticFramework),
        ExtensionKitExtension => {
            linkable || (from.platform == Platform::MacOs && to.product == Xpc)
        }
        _ => linkable,
    }
}

fn lint_app_clip_entitlements(target: &Target, ctx: &ProjectContext<'_>) -> Option<LintingIssue> {
    match &target.entitlements {
        None => Some(LintingIssue::error(format!(
            "An AppClip '{}' requires its Parent Application Identifiers Entitlement to be set",
            target.name
        ))),
        Some(path) if !ctx.fs.exists(path) => Some(LintingIssue::error(format!(
            "The entitlements at path '{}' referenced by target does not exist",
            path.display()
        ))),
        Some(_) => None,
    }
}

fn lint_app_clip_count(app: &GraphTarget<'_>, dependencies: &[GraphTarget<'_>]) -> Option<LintingIssue> {
    let mut clips: Vec<&str> = dependencies
        .iter()
        .filter(|dep| dep.product() == Product::AppClip)
        .map(GraphTarget::name)
        .collect();
    if clips.len() < 2 {
        return None;
    }
    clips.sort_unstable();
    Some(LintingIssue::error(format!(
        "Target '{}' at path '{}' cannot depend on more than one app clip: {}",
        app.name(),
        app.project.path.display(),
        listed(&clips)
    )))
}

#[derive(Debug, Clone, Copy)]
enum Relationship {
    WatchApp,
    WatchExtension,
    AppClip,
}

fn lint_bundle_id_prefix(relationship: Relationship, child: &Target, parent: &Target) -> Option<LintingIssue> {
    if has_variables(&child.bundle_id) || has_variables(&parent.bundle_id) {
        return None;
    }
    if child.bundle_id.starts_with(&format!("{}.", parent.bundle_id)) {
        return None;
    }
    let (child_kind, parent_kind) = match relationship {
        Relationship::WatchApp => ("Watch app", "app"),
        Relationship::WatchExtension => ("Watch extension", "watch app"),
        Relationship::AppClip => ("AppClip", "app"),
    };
    Some(LintingIssue::error(format!(
        "{child_kind} '{}' bundleId: {} isn't prefixed with its parent's {parent_kind} '{}' bundleId '{}'",
        child.name, child.bundle_id, parent.name, parent.bundle_id
    )))
}

fn has_variables(value: &str) -> bool {
    value.contains("${") || value.contains("$(")
}

/// Joins names as `A`, `A and B`, or `A, B and C`.
fn listed(names: &[&str]) -> String {
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, init)) => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lint_graph, lint_project, lint_project_with, reasons, Files};
    use xcgraph_lint_core::model::{Project, TargetDependency};
    use xcgraph_lint_core::{Graph, LintOptions, OsFileSystem};

    fn graph(targets: Vec<Target>) -> Graph {
        let project = targets
            .into_iter()
            .fold(Project::new("/Project", "Project"), Project::with_target);
        Graph::builder().project(project).build().unwrap()
    }

    fn depends(target: Target, names: &[&str]) -> Target {
        names
            .iter()
            .fold(target, |t, name| t.with_dependency(TargetDependency::target(*name)))
    }

    // --- Matrix ---

    #[test]
    fn command_line_tool_cannot_link_dynamic_products() {
        let tool = depends(
            Target::new("Tool", Platform::MacOs, Product::CommandLineTool),
            &["Framework", "Dylib"],
        );
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &graph(vec![
                tool,
                Target::new("Framework", Platform::MacOs, Product::Framework),
                Target::new("Dylib", Platform::MacOs, Product::DynamicLibrary),
            ]),
        );
        assert_eq!(
            reasons(&issues),
            vec![
                "Target Tool has a dependency with target Framework of type framework for platform 'macOS' which is invalid or not supported yet.",
                "Target Tool has a dependency with target Dylib of type dynamic library for platform 'macOS' which is invalid or not supported yet.",
            ]
        );
        assert!(issues.iter().all(LintingIssue::is_error));
    }

    #[test]
    fn command_line_tool_links_static_products() {
        let tool = depends(
            Target::new("Tool", Platform::MacOs, Product::CommandLineTool),
            &["StaticLibrary", "StaticFramework"],
        );
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &graph(vec![
                tool,
                Target::new("StaticLibrary", Platform::MacOs, Product::StaticLibrary),
                Target::new("StaticFramework", Platform::MacOs, Product::StaticFramework),
            ]),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn watch_app_depends_only_on_watch_extension() {
        let watch = Target::new("Watch", Platform::WatchOs, Product::Watch2App);
        let extension = Target::new("Extension", Platform::WatchOs, Product::Watch2Extension);
        let framework = Target::new("Kit", Platform::WatchOs, Product::Framework);

        assert!(is_supported_dependency(&watch, &extension));
        assert!(!is_supported_dependency(&watch, &framework));
        assert!(is_supported_dependency(&extension, &framework));
    }

    #[test]
    fn cross_platform_static_linkage_is_rejected() {
        let mac = Target::new("MacStatic", Platform::MacOs, Product::StaticLibrary);
        let ios = Target::new("IosStatic", Platform::Ios, Product::StaticLibrary);
        assert!(!is_supported_dependency(&mac, &ios));
        assert!(is_supported_dependency(&mac, &Target::new("Other", Platform::MacOs, Product::StaticFramework)));
    }

    #[test]
    fn ios_app_embeds_watch_app() {
        let app = Target::new("App", Platform::Ios, Product::App);
        let watch = Target::new("Watch", Platform::WatchOs, Product::Watch2App);
        let watch_framework = Target::new("WatchKit", Platform::WatchOs, Product::Framework);
        assert!(is_supported_dependency(&app, &watch));
        assert!(!is_supported_dependency(&app, &watch_framework));
    }

    #[test]
    fn anything_may_use_a_macos_bundle() {
        let bundle = Target::new("Resources", Platform::MacOs, Product::Bundle);
        for from in [
            Target::new("Tests", Platform::Ios, Product::UnitTests),
            Target::new("App", Platform::Ios, Product::App),
            Target::new("Tool", Platform::MacOs, Product::CommandLineTool),
        ] {
            assert!(is_supported_dependency(&from, &bundle), "{}", from.name);
        }
    }

    #[test]
    fn macos_bundle_may_depend_on_ios_targets() {
        let bundle = depends(Target::new("Bundle", Platform::MacOs, Product::Bundle), &["App", "Framework"]);
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &graph(vec![
                bundle,
                Target::new("App", Platform::Ios, Product::App),
                Target::new("Framework", Platform::Ios, Product::Framework),
            ]),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn macos_extension_kit_extension_embeds_xpc_service() {
        let extension = depends(
            Target::new("Extension", Platform::MacOs, Product::ExtensionKitExtension),
            &["XPCService"],
        );
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &graph(vec![extension, Target::new("XPCService", Platform::MacOs, Product::Xpc)]),
        );
        assert!(issues.is_empty());

        let ios_extension = Target::new("Extension", Platform::Ios, Product::ExtensionKitExtension);
        let ios_xpc = Target::new("XPCService", Platform::Ios, Product::Xpc);
        assert!(!is_supported_dependency(&ios_extension, &ios_xpc));
    }

    #[test]
    fn cross_platform_error_names_the_dependency_platform() {
        let app = depends(Target::new("App", Platform::Ios, Product::App), &["MacKit"]);
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &graph(vec![app, Target::new("MacKit", Platform::MacOs, Product::Framework)]),
        );
        assert_eq!(
            reasons(&issues),
            vec!["Target App has a dependency with target MacKit of type framework for platform 'macOS' which is invalid or not supported yet."]
        );
    }

    #[test]
    fn test_bundles_depend_on_apps_and_linkables() {
        let tests = Target::new("Tests", Platform::Ios, Product::UnitTests);
        assert!(is_supported_dependency(&tests, &Target::new("App", Platform::Ios, Product::App)));
        assert!(is_supported_dependency(&tests, &Target::new("Kit", Platform::Ios, Product::Framework)));
        assert!(!is_supported_dependency(
            &tests,
            &Target::new("Other", Platform::Ios, Product::UiTests)
        ));
    }

    // --- App Clips ---

    #[test]
    fn app_with_two_app_clips_is_an_error() {
        let app = depends(Target::new("App", Platform::Ios, Product::App), &["ClipB", "ClipA"])
            .with_bundle_id("dev.app");
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &graph(vec![
                app,
                Target::new("ClipB", Platform::Ios, Product::AppClip).with_bundle_id("dev.app.clipb"),
                Target::new("ClipA", Platform::Ios, Product::AppClip).with_bundle_id("dev.app.clipa"),
            ]),
        );
        assert_eq!(
            reasons(&issues),
            vec!["Target 'App' at path '/Project' cannot depend on more than one app clip: ClipA and ClipB"]
        );
    }

    #[test]
    fn app_clip_list_joins_names() {
        assert_eq!(listed(&["A"]), "A");
        assert_eq!(listed(&["A", "B", "C"]), "A, B and C");
    }

    #[test]
    fn app_clip_requires_entitlements() {
        let project = Project::new("/App", "App")
            .with_target(Target::new("Clip", Platform::Ios, Product::AppClip))
            .with_target(
                Target::new("Other", Platform::Ios, Product::AppClip)
                    .with_entitlements("/App/Other.entitlements"),
            );
        let options = LintOptions::default();
        let issues = lint_project_with(&ProductCompatibilityLinter, &project, &Files::new(&[]), &options);
        assert_eq!(
            reasons(&issues),
            vec![
                "An AppClip 'Clip' requires its Parent Application Identifiers Entitlement to be set",
                "The entitlements at path '/App/Other.entitlements' referenced by target does not exist",
            ]
        );
    }

    // --- Bundle identifiers ---

    fn watch_graph(app_id: &str, watch_id: &str, extension_id: &str) -> Graph {
        graph(vec![
            depends(Target::new("App", Platform::Ios, Product::App), &["WatchApp"]).with_bundle_id(app_id),
            depends(Target::new("WatchApp", Platform::WatchOs, Product::Watch2App), &["WatchExtension"])
                .with_bundle_id(watch_id),
            Target::new("WatchExtension", Platform::WatchOs, Product::Watch2Extension)
                .with_bundle_id(extension_id),
        ])
    }

    #[test]
    fn watch_app_bundle_id_must_be_prefixed() {
        let issues = lint_graph(&ProductCompatibilityLinter, &watch_graph("app", "watchapp", "watchapp.ext"));
        assert_eq!(
            reasons(&issues),
            vec!["Watch app 'WatchApp' bundleId: watchapp isn't prefixed with its parent's app 'App' bundleId 'app'"]
        );

        let ok = lint_graph(&ProductCompatibilityLinter, &watch_graph("app", "app.watchapp", "app.watchapp.ext"));
        assert!(ok.is_empty());
    }

    #[test]
    fn watch_extension_bundle_id_must_be_prefixed() {
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &watch_graph("app", "app.watchapp", "app.extension"),
        );
        assert_eq!(
            reasons(&issues),
            vec!["Watch extension 'WatchExtension' bundleId: app.extension isn't prefixed with its parent's watch app 'WatchApp' bundleId 'app.watchapp'"]
        );
    }

    #[test]
    fn app_clip_bundle_id_must_be_prefixed() {
        let app = depends(Target::new("App", Platform::Ios, Product::App), &["Clip"]).with_bundle_id("dev.app");
        let clip = Target::new("Clip", Platform::Ios, Product::AppClip).with_bundle_id("dev.clip");
        assert_eq!(
            reasons(&lint_graph(&ProductCompatibilityLinter, &graph(vec![app, clip]))),
            vec!["AppClip 'Clip' bundleId: dev.clip isn't prefixed with its parent's app 'App' bundleId 'dev.app'"]
        );
    }

    #[test]
    fn bundle_ids_with_variables_are_not_checked() {
        let issues = lint_graph(
            &ProductCompatibilityLinter,
            &watch_graph("${PRODUCT_BUNDLE_IDENTIFIER}", "watchapp", "$(WATCH_ID).ext"),
        );
        assert!(issues.is_empty());
    }

    // --- Project checks ---

    #[test]
    fn product_unsupported_on_platform() {
        let project = Project::new("/App", "App")
            .with_target(Target::new("Clip", Platform::MacOs, Product::AppClip).with_entitlements("/App/Clip.entitlements"));
        assert_eq!(
            reasons(&lint_project(&ProductCompatibilityLinter, &project)),
            vec!["'Clip' for platform 'macOS' can't have a product type 'appClip'"]
        );
    }

    #[test]
    fn ios_bundles_cannot_contain_sources() {
        let project = Project::new("/App", "App")
            .with_target(Target::new("Resources", Platform::Ios, Product::Bundle).with_source("/App/Code.swift"))
            .with_target(Target::new("Plugin", Platform::MacOs, Product::Bundle).with_source("/App/Plugin.swift"));
        assert_eq!(
            reasons(&lint_project(&ProductCompatibilityLinter, &project)),
            vec!["Target 'Resources' cannot contain source files. Bundles on platform 'iOS' only support resources."]
        );
    }

    #[test]
    fn resources_need_bundle_accessors_for_static_products() {
        let project = Project::new("/App", "App")
            .with_target(Target::new("Core", Platform::Ios, Product::StaticFramework).with_resource("/App/image.png"))
            .with_target(Target::new("Kit", Platform::Ios, Product::Framework).with_resource("/App/image.png"));

        assert!(lint_project(&ProductCompatibilityLinter, &project).is_empty());

        let disabled = LintOptions {
            disable_bundle_accessors: true,
        };
        let issues = lint_project_with(&ProductCompatibilityLinter, &project, &OsFileSystem, &disabled);
        assert_eq!(
            reasons(&issues),
            vec!["Target Core cannot contain resources. For static framework targets to support resources, 'Bundle Accessors' feature should be enabled."]
        );
    }
}
