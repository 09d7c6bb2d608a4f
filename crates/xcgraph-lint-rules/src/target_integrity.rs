//! Rule to validate the declaration of each target on its own.
//!
//! # Checks
//!
//! | Check | Severity |
//! |-------|----------|
//! | Product name characters | warning |
//! | Bundle identifier characters | error |
//! | No sources, dependencies, or scripts | warning |
//! | Info.plist or entitlements copied as resources | warning |
//! | Info.plist or entitlements missing on disk | error |
//! | Resources on a command line tool | error |
//! | Deployment target version format | error |
//! | Duplicate dependency declarations | warning |
//! | Core Data model or current version missing | error |
//! | Code generation on unsupported files | warning |
//! | `PRODUCT_NAME` differing or containing variables | warning |
//! | Prefetched on-demand tag also installed initially | warning |
//!
//! Build setting variables such as `$(TARGET_NAME)`, `${PRODUCT_NAME}` or
//! `$PRODUCT_NAME` are resolved at build time, so names containing them are
//! not validated.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use xcgraph_lint_core::model::{Product, Target};
use xcgraph_lint_core::{FileSystem, LintingIssue, ProjectContext, ProjectRule};

/// Rule code for target-integrity.
pub const CODE: &str = "XG004";

/// Rule name for target-integrity.
pub const NAME: &str = "target-integrity";

/// Build setting holding the product name.
const PRODUCT_NAME: &str = "PRODUCT_NAME";

/// Extensions supporting custom code generation attributes.
const CODE_GEN_EXTENSIONS: &[&str] = &["intentdefinition", "mlmodel", "mlpackage"];

#[allow(clippy::expect_used)]
static APP_PRODUCT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").expect("valid product name pattern"));

#[allow(clippy::expect_used)]
static PRODUCT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid product name pattern"));

#[allow(clippy::expect_used)]
static BUNDLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.\-]+$").expect("valid bundle id pattern"));

#[allow(clippy::expect_used)]
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{[^}]*\}|\$\([^)]*\)").expect("valid build setting variable pattern")
});

#[allow(clippy::expect_used)]
static VARIABLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[\w({]").expect("valid variable reference pattern"));

#[allow(clippy::expect_used)]
static DEPLOYMENT_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+){0,2}$").expect("valid version pattern"));

/// Validates the declaration of each target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetIntegrityLinter;

impl TargetIntegrityLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks a single target against the file system.
    #[must_use]
    pub fn lint_target(&self, target: &Target, fs: &dyn FileSystem) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        issues.extend(lint_product_name(target));
        issues.extend(lint_bundle_id(target));
        issues.extend(lint_has_sources(target));
        issues.extend(lint_copied_files(target));
        issues.extend(lint_info_plist_and_entitlements(target, fs));
        issues.extend(lint_resources_support(target));
        issues.extend(lint_deployment_version(target));
        issues.extend(lint_duplicate_dependencies(target));
        issues.extend(lint_core_data_models(target, fs));
        issues.extend(lint_code_gen(target));
        issues.extend(lint_product_name_setting(target));
        issues.extend(lint_on_demand_resources(target));
        issues
    }
}

impl ProjectRule for TargetIntegrityLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Validates names, files, and declarations of each target"
    }

    fn check_project(&self, ctx: &ProjectContext<'_>) -> Vec<LintingIssue> {
        ctx.project
            .targets
            .iter()
            .flat_map(|target| self.lint_target(target, ctx.fs))
            .collect()
    }
}

fn has_variables(value: &str) -> bool {
    VARIABLE_REFERENCE.is_match(value)
}

fn lint_product_name(target: &Target) -> Option<LintingIssue> {
    let name = target.product_name();
    if has_variables(name) {
        return None;
    }
    let app_like = matches!(
        target.product,
        Product::App | Product::AppClip | Product::Watch2App | Product::Bundle
    );
    let (pattern, allowed) = if app_like {
        (
            &*APP_PRODUCT_NAME,
            "alphanumeric (A-Z,a-z,0-9), period (.), hyphen (-), and underscore (_)",
        )
    } else {
        (&*PRODUCT_NAME_PATTERN, "alphanumeric (A-Z,a-z,0-9), and underscore (_)")
    };
    (!pattern.is_match(name)).then(|| {
        LintingIssue::warning(format!(
            "Invalid product name '{name}'. This string must contain only {allowed} characters."
        ))
    })
}

fn lint_bundle_id(target: &Target) -> Option<LintingIssue> {
    let bundle_id = &target.bundle_id;
    let stripped = VARIABLE.replace_all(bundle_id, "");
    let valid = if bundle_id.is_empty() {
        false
    } else {
        stripped.is_empty() || BUNDLE_ID.is_match(&stripped)
    };
    (!valid).then(|| {
        LintingIssue::error(format!(
            "Invalid bundle identifier '{bundle_id}'. This string must be a uniform type identifier (UTI) that contains only alphanumeric (A-Z,a-z,0-9), hyphen (-), and period (.) characters."
        ))
    })
}

fn lint_has_sources(target: &Target) -> Option<LintingIssue> {
    let resource_only = matches!(
        target.product,
        Product::Bundle | Product::Watch2App | Product::StickerPackExtension
    );
    if resource_only
        || !target.sources.is_empty()
        || !target.dependencies.is_empty()
        || !target.scripts.is_empty()
    {
        return None;
    }
    Some(LintingIssue::warning(format!(
        "The target {} doesn't contain source files.",
        target.name
    )))
}

fn lint_copied_files(target: &Target) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for resource in &target.resources {
        let file_name = resource.file_name().and_then(|n| n.to_str());
        if target.info_plist.as_deref() == Some(resource.as_path()) || file_name == Some("Info.plist") {
            issues.push(LintingIssue::warning(format!(
                "Info.plist at path {} being copied into the target {} product.",
                resource.display(),
                target.name
            )));
        } else if target.entitlements.as_deref() == Some(resource.as_path())
            || resource.extension().is_some_and(|ext| ext == "entitlements")
        {
            issues.push(LintingIssue::warning(format!(
                "Entitlements file at path {} being copied into the target {} product.",
                resource.display(),
                target.name
            )));
        }
    }
    issues
}

fn lint_info_plist_and_entitlements(target: &Target, fs: &dyn FileSystem) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    if let Some(path) = target.info_plist.as_deref() {
        if !fs.exists(path) {
            issues.push(not_found("Info.plist file", path));
        }
    }
    // App Clip entitlements are validated with the product checks.
    if target.product != Product::AppClip {
        if let Some(path) = target.entitlements.as_deref() {
            if !fs.exists(path) {
                issues.push(not_found("Entitlements file", path));
            }
        }
    }
    issues
}

fn not_found(what: &str, path: &Path) -> LintingIssue {
    LintingIssue::error(format!("{what} not found at path {}", path.display()))
}

fn lint_resources_support(target: &Target) -> Option<LintingIssue> {
    (target.product == Product::CommandLineTool && !target.resources.is_empty()).then(|| {
        LintingIssue::error(format!(
            "Target {} cannot contain resources. Targets of type '{}' do not support resources.",
            target.name, target.product
        ))
    })
}

fn lint_deployment_version(target: &Target) -> Option<LintingIssue> {
    let deployment = target.deployment_target.as_ref()?;
    (!DEPLOYMENT_VERSION.is_match(&deployment.version))
        .then(|| LintingIssue::error("The version of deployment target is incorrect"))
}

fn lint_duplicate_dependencies(target: &Target) -> Vec<LintingIssue> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut issues = Vec::new();
    for dependency in &target.dependencies {
        if !seen.insert(dependency) && reported.insert(dependency) {
            issues.push(LintingIssue::warning(format!(
                "Target '{}' has duplicate {} dependency specified: '{}'",
                target.name,
                dependency.type_name(),
                dependency.name()
            )));
        }
    }
    issues
}

fn lint_core_data_models(target: &Target, fs: &dyn FileSystem) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for model in &target.core_data_models {
        if !fs.exists(&model.path) {
            issues.push(LintingIssue::error(format!(
                "The Core Data model at path {} does not exist",
                model.path.display()
            )));
            continue;
        }
        let version = model.current_version_path();
        if !fs.exists(&version) {
            issues.push(LintingIssue::error(format!(
                "The default version of the Core Data model at path {}, {}, does not exist. There should be a file at {}",
                model.path.display(),
                model.current_version,
                version.display()
            )));
        }
    }
    issues
}

fn lint_code_gen(target: &Target) -> Vec<LintingIssue> {
    target
        .sources
        .iter()
        .filter(|source| source.code_gen.is_some())
        .filter(|source| {
            !source
                .path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| CODE_GEN_EXTENSIONS.contains(&ext))
        })
        .map(|source| {
            LintingIssue::warning(format!(
                "Target '{}' has a source file at path {} with unsupported `codeGen` attributes. Only intentdefinition and mlmodel are known to support this.",
                target.name,
                source.path.display()
            ))
        })
        .collect()
}

fn lint_product_name_setting(target: &Target) -> Vec<LintingIssue> {
    let Some(settings) = &target.settings else {
        return Vec::new();
    };
    let values: BTreeSet<&str> = settings
        .base
        .get(PRODUCT_NAME)
        .into_iter()
        .chain(settings.configurations.iter().filter_map(|c| c.settings.get(PRODUCT_NAME)))
        .map(String::as_str)
        .collect();

    let mut issues = Vec::new();
    if values.len() > 1 {
        issues.push(LintingIssue::warning(format!(
            "The target '{}' has a PRODUCT_NAME build setting that is different across configurations and might cause unpredictable behaviours.",
            target.name
        )));
    }
    if values.iter().any(|value| has_variables(value)) {
        issues.push(LintingIssue::warning(format!(
            "The target '{}' has a PRODUCT_NAME build setting containing variables that are resolved at build time, and might cause unpredictable behaviours.",
            target.name
        )));
    }
    issues
}

fn lint_on_demand_resources(target: &Target) -> Vec<LintingIssue> {
    let Some(tags) = &target.on_demand_resources_tags else {
        return Vec::new();
    };
    let initial: HashSet<&str> = tags.initial_install.iter().map(String::as_str).collect();
    tags.prefetch_order
        .iter()
        .filter(|tag| initial.contains(tag.as_str()))
        .map(|tag| {
            LintingIssue::warning(format!(
                "Prefetched Order Tag \"{tag}\" is already assigned to Initial Install Tags category for the target {} and will be ignored by Xcode",
                target.name
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{reasons, Files};
    use xcgraph_lint_core::model::{
        BuildConfiguration, CodeGen, Configuration, OnDemandResourcesTags, Platform, Settings,
        SourceFile, TargetDependency,
    };
    use xcgraph_lint_core::Severity;

    fn app(name: &str) -> Target {
        Target::new(name, Platform::Ios, Product::App).with_source("/App/main.swift")
    }

    fn lint(target: &Target) -> Vec<String> {
        reasons(&TargetIntegrityLinter.lint_target(target, &Files::all()))
    }

    fn lint_with(target: &Target, files: &Files) -> Vec<LintingIssue> {
        TargetIntegrityLinter.lint_target(target, files)
    }

    // --- Names ---

    #[test]
    fn app_product_names_allow_periods_and_hyphens() {
        assert!(lint(&app("App").with_product_name("My.App-Name_2")).is_empty());
        assert_eq!(
            lint(&app("App").with_product_name("My App")),
            vec!["Invalid product name 'My App'. This string must contain only alphanumeric (A-Z,a-z,0-9), period (.), hyphen (-), and underscore (_) characters."]
        );
    }

    #[test]
    fn framework_product_names_disallow_periods() {
        let target = Target::new("Kit", Platform::Ios, Product::Framework)
            .with_source("/Kit/Kit.swift")
            .with_product_name("Kit.Core");
        let issues = TargetIntegrityLinter.lint_target(&target, &Files::all());
        assert_eq!(
            reasons(&issues),
            vec!["Invalid product name 'Kit.Core'. This string must contain only alphanumeric (A-Z,a-z,0-9), and underscore (_) characters."]
        );
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn product_names_with_variables_are_skipped() {
        assert!(lint(&app("App").with_product_name("$(TARGET_NAME) Beta")).is_empty());
    }

    #[test]
    fn bundle_identifier_characters() {
        let invalid = "Invalid bundle identifier 'dev_app'. This string must be a uniform type identifier (UTI) that contains only alphanumeric (A-Z,a-z,0-9), hyphen (-), and period (.) characters.";
        assert_eq!(lint(&app("App").with_bundle_id("dev_app")), vec![invalid]);
        assert!(lint(&app("App").with_bundle_id("dev.my-app")).is_empty());
        assert!(lint(&app("App").with_bundle_id("${PRODUCT_BUNDLE_IDENTIFIER}")).is_empty());
        assert!(lint(&app("App").with_bundle_id("dev.$(SUFFIX).app")).is_empty());
        assert_eq!(lint(&app("App").with_bundle_id("")).len(), 1);
    }

    // --- Sources ---

    #[test]
    fn framework_without_sources_warns() {
        let target = Target::new("Framework1", Platform::Ios, Product::Framework);
        let issues = lint_with(&target, &Files::all());
        assert_eq!(reasons(&issues), vec!["The target Framework1 doesn't contain source files."]);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn dependencies_or_scripts_suppress_missing_sources() {
        let with_dependency = Target::new("Umbrella", Platform::Ios, Product::Framework)
            .with_dependency(TargetDependency::target("Core"));
        let with_script = Target::new("Lint", Platform::Ios, Product::Framework).with_script("swiftlint");
        let bundle = Target::new("Resources", Platform::Ios, Product::Bundle);
        assert!(lint(&with_dependency).is_empty());
        assert!(lint(&with_script).is_empty());
        assert!(lint(&bundle).is_empty());
    }

    #[test]
    fn unsupported_code_gen_attributes_warn() {
        let target = app("App")
            .with_source(SourceFile::new("/App/Intents.intentdefinition").with_code_gen(CodeGen::Public))
            .with_source(SourceFile::new("/App/Model.mlmodel").with_code_gen(CodeGen::Private))
            .with_source(SourceFile::new("/App/View.swift").with_code_gen(CodeGen::Project));
        assert_eq!(
            lint(&target),
            vec!["Target 'App' has a source file at path /App/View.swift with unsupported `codeGen` attributes. Only intentdefinition and mlmodel are known to support this."]
        );
    }

    // --- Files ---

    #[test]
    fn info_plist_and_entitlements_copied_as_resources() {
        let target = app("App")
            .with_info_plist("/App/Info.plist")
            .with_entitlements("/App/App.entitlements")
            .with_resource("/App/Info.plist")
            .with_resource("/App/App.entitlements")
            .with_resource("/App/image.png");
        assert_eq!(
            lint(&target),
            vec![
                "Info.plist at path /App/Info.plist being copied into the target App product.",
                "Entitlements file at path /App/App.entitlements being copied into the target App product.",
            ]
        );
    }

    #[test]
    fn missing_info_plist_and_entitlements() {
        let target = app("App")
            .with_info_plist("/App/Info.plist")
            .with_entitlements("/App/App.entitlements");
        let issues = lint_with(&target, &Files::new(&[]));
        assert_eq!(
            reasons(&issues),
            vec![
                "Info.plist file not found at path /App/Info.plist",
                "Entitlements file not found at path /App/App.entitlements",
            ]
        );
        assert!(issues.iter().all(LintingIssue::is_error));
    }

    #[test]
    fn command_line_tool_cannot_have_resources() {
        let tool = Target::new("Tool", Platform::MacOs, Product::CommandLineTool)
            .with_source("/Tool/main.swift")
            .with_resource("/Tool/data.json");
        assert_eq!(
            lint(&tool),
            vec!["Target Tool cannot contain resources. Targets of type 'command line tool' do not support resources."]
        );
    }

    #[test]
    fn core_data_models_must_exist_with_their_version() {
        let target = app("App")
            .with_core_data_model("/App/Model.xcdatamodeld", "Model 2")
            .with_core_data_model("/App/Missing.xcdatamodeld", "1");
        let files = Files::new(&["/App/Model.xcdatamodeld"]);
        assert_eq!(
            reasons(&lint_with(&target, &files)),
            vec![
                "The default version of the Core Data model at path /App/Model.xcdatamodeld, Model 2, does not exist. There should be a file at /App/Model.xcdatamodeld/Model 2.xcdatamodel",
                "The Core Data model at path /App/Missing.xcdatamodeld does not exist",
            ]
        );
    }

    // --- Declarations ---

    #[test]
    fn deployment_target_version_format() {
        for valid in ["13", "13.0", "13.0.1"] {
            assert!(lint(&app("App").with_deployment_target(Platform::Ios, valid)).is_empty(), "{valid}");
        }
        for invalid in ["13.0.1.2", "v13", "13.x", ""] {
            assert_eq!(
                lint(&app("App").with_deployment_target(Platform::Ios, invalid)),
                vec!["The version of deployment target is incorrect"],
                "{invalid}"
            );
        }
    }

    #[test]
    fn duplicate_dependencies_are_reported_once() {
        let target = app("App")
            .with_dependency(TargetDependency::sdk("libc++.tbd"))
            .with_dependency(TargetDependency::framework("/Frameworks/Kit.framework"))
            .with_dependency(TargetDependency::sdk("libc++.tbd"))
            .with_dependency(TargetDependency::framework("/Frameworks/Kit.framework"))
            .with_dependency(TargetDependency::sdk("libc++.tbd"));
        assert_eq!(
            lint(&target),
            vec![
                "Target 'App' has duplicate sdk dependency specified: 'libc++.tbd'",
                "Target 'App' has duplicate framework dependency specified: '/Frameworks/Kit.framework'",
            ]
        );
    }

    #[test]
    fn product_name_setting_across_configurations() {
        let settings = Settings::with_configurations(vec![
            Configuration::new(BuildConfiguration::debug("Debug")).with_setting(PRODUCT_NAME, "App"),
            Configuration::new(BuildConfiguration::release("Release")).with_setting(PRODUCT_NAME, "$(TARGET_NAME)"),
        ]);
        assert_eq!(
            lint(&app("App").with_settings(settings)),
            vec![
                "The target 'App' has a PRODUCT_NAME build setting that is different across configurations and might cause unpredictable behaviours.",
                "The target 'App' has a PRODUCT_NAME build setting containing variables that are resolved at build time, and might cause unpredictable behaviours.",
            ]
        );

        let consistent = Settings::default().with_base(PRODUCT_NAME, "App");
        assert!(lint(&app("App").with_settings(consistent)).is_empty());
    }

    #[test]
    fn product_name_setting_with_bare_variable() {
        let settings = Settings::with_configurations(vec![
            Configuration::new(BuildConfiguration::debug("Debug")).with_setting(PRODUCT_NAME, "$VARIABLE"),
            Configuration::new(BuildConfiguration::release("Release")).with_setting(PRODUCT_NAME, "$VARIABLE"),
        ])
        .with_base(PRODUCT_NAME, "$VARIABLE");
        assert_eq!(
            lint(&app("App").with_settings(settings)),
            vec!["The target 'App' has a PRODUCT_NAME build setting containing variables that are resolved at build time, and might cause unpredictable behaviours."]
        );
    }

    #[test]
    fn dollar_sign_alone_is_not_a_variable() {
        assert!(has_variables("$(TARGET_NAME)"));
        assert!(has_variables("${TARGET_NAME}"));
        assert!(has_variables("App$SUFFIX"));
        assert!(!has_variables("App$"));
        assert!(!has_variables("App $ Tool"));
    }

    #[test]
    fn prefetched_tags_already_installed_initially() {
        let tags = OnDemandResourcesTags {
            initial_install: vec!["tag1".to_string(), "tag2".to_string()],
            prefetch_order: vec!["tag2".to_string(), "tag3".to_string()],
        };
        assert_eq!(
            lint(&app("App").with_on_demand_resources_tags(tags)),
            vec!["Prefetched Order Tag \"tag2\" is already assigned to Initial Install Tags category for the target App and will be ignored by Xcode"]
        );
    }
}
