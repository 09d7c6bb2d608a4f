//! Targets and their declared dependencies.

use super::platform::{Platform, Product};
use super::settings::Settings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a precompiled artifact or package product is linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linking {
    /// Linked into the consumer's binary.
    #[default]
    Static,
    /// Loaded at runtime.
    Dynamic,
}

pub(crate) fn dynamic_linking() -> Linking {
    Linking::Dynamic
}

/// Whether an SDK dependency is required or weakly linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkStatus {
    /// Strongly linked.
    #[default]
    Required,
    /// Weakly linked.
    Optional,
}

/// A dependency as declared on a target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetDependency {
    /// Another target of the same project.
    Target {
        /// Target name.
        name: String,
    },
    /// A target of another project.
    Project {
        /// Target name.
        target: String,
        /// Path of the project declaring it.
        path: PathBuf,
    },
    /// A precompiled framework.
    Framework {
        /// Path to the `.framework`.
        path: PathBuf,
        /// Linking of the binary, dynamic unless stated otherwise.
        #[serde(default = "dynamic_linking")]
        linking: Linking,
        /// Whether the framework is produced by Carthage.
        #[serde(default)]
        is_carthage: bool,
    },
    /// A precompiled XCFramework.
    #[serde(rename = "xcframework")]
    XcFramework {
        /// Path to the `.xcframework`.
        path: PathBuf,
        /// Linking of the binaries, dynamic unless stated otherwise.
        #[serde(default = "dynamic_linking")]
        linking: Linking,
    },
    /// A precompiled library.
    Library {
        /// Path to the library binary.
        path: PathBuf,
        /// Linking of the library, static unless stated otherwise.
        #[serde(default)]
        linking: Linking,
    },
    /// A Swift package product.
    Package {
        /// Product name.
        product: String,
        /// Linking of the product, static unless stated otherwise.
        #[serde(default)]
        linking: Linking,
    },
    /// A system SDK.
    Sdk {
        /// SDK file name, e.g. `libc++.tbd`.
        name: String,
        /// Required or optional.
        #[serde(default)]
        status: SdkStatus,
    },
}

impl TargetDependency {
    /// Declares a dependency on a target of the same project.
    #[must_use]
    pub fn target(name: impl Into<String>) -> Self {
        Self::Target { name: name.into() }
    }

    /// Declares a dependency on a target of another project.
    #[must_use]
    pub fn project(target: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Project {
            target: target.into(),
            path: path.into(),
        }
    }

    /// Declares a dependency on a precompiled dynamic framework.
    #[must_use]
    pub fn framework(path: impl Into<PathBuf>) -> Self {
        Self::Framework {
            path: path.into(),
            linking: Linking::Dynamic,
            is_carthage: false,
        }
    }

    /// Declares a dependency on a precompiled static library.
    #[must_use]
    pub fn library(path: impl Into<PathBuf>) -> Self {
        Self::Library {
            path: path.into(),
            linking: Linking::Static,
        }
    }

    /// Declares a dependency on a static package product.
    #[must_use]
    pub fn package(product: impl Into<String>) -> Self {
        Self::Package {
            product: product.into(),
            linking: Linking::Static,
        }
    }

    /// Declares a dependency on a required SDK.
    #[must_use]
    pub fn sdk(name: impl Into<String>) -> Self {
        Self::Sdk {
            name: name.into(),
            status: SdkStatus::Required,
        }
    }

    /// Short name of the dependency kind, as used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Target { .. } => "target",
            Self::Project { .. } => "project",
            Self::Framework { .. } => "framework",
            Self::XcFramework { .. } => "xcframework",
            Self::Library { .. } => "library",
            Self::Package { .. } => "package",
            Self::Sdk { .. } => "sdk",
        }
    }

    /// Name of the dependency, as used in diagnostics.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Target { name } | Self::Sdk { name, .. } => name.clone(),
            Self::Project { target, .. } => target.clone(),
            Self::Framework { path, .. }
            | Self::XcFramework { path, .. }
            | Self::Library { path, .. } => path.display().to_string(),
            Self::Package { product, .. } => product.clone(),
        }
    }
}

/// Custom code generation visibility for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeGen {
    /// Generated code is public.
    Public,
    /// Generated code is private.
    Private,
    /// Generated code is project-visible.
    Project,
    /// No code is generated.
    Disabled,
}

/// A source file of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Code generation attribute, if any.
    #[serde(default)]
    pub code_gen: Option<CodeGen>,
}

impl SourceFile {
    /// Creates a source file without code generation attributes.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            code_gen: None,
        }
    }

    /// Sets the code generation attribute.
    #[must_use]
    pub fn with_code_gen(mut self, code_gen: CodeGen) -> Self {
        self.code_gen = Some(code_gen);
        self
    }
}

/// A Core Data model bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDataModel {
    /// Path of the `.xcdatamodeld` bundle.
    pub path: PathBuf,
    /// Name of the current model version.
    pub current_version: String,
}

impl CoreDataModel {
    /// Path the current version file is expected at.
    #[must_use]
    pub fn current_version_path(&self) -> PathBuf {
        self.path
            .join(format!("{}.xcdatamodel", self.current_version))
    }
}

/// A script build phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetScript {
    /// Phase name.
    pub name: String,
    /// Inline script body.
    #[serde(default)]
    pub script: String,
}

/// Deployment target of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    /// Platform family the version applies to.
    pub platform: Platform,
    /// Minimum OS version, e.g. `13.0`.
    pub version: String,
}

/// On-demand resource tags of a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnDemandResourcesTags {
    /// Tags downloaded with the app.
    #[serde(default)]
    pub initial_install: Vec<String>,
    /// Tags downloaded right after install.
    #[serde(default)]
    pub prefetch_order: Vec<String>,
}

/// A buildable unit of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Name, unique within the project.
    pub name: String,
    /// Platform the target builds for.
    pub platform: Platform,
    /// Product type.
    pub product: Product,
    /// Product name; the target name when not set.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Bundle identifier.
    pub bundle_id: String,
    /// Deployment target.
    #[serde(default)]
    pub deployment_target: Option<DeploymentTarget>,
    /// Info.plist file.
    #[serde(default)]
    pub info_plist: Option<PathBuf>,
    /// Entitlements file.
    #[serde(default)]
    pub entitlements: Option<PathBuf>,
    /// Target-level settings.
    #[serde(default)]
    pub settings: Option<Settings>,
    /// Source files.
    #[serde(default)]
    pub sources: Vec<SourceFile>,
    /// Resource files.
    #[serde(default)]
    pub resources: Vec<PathBuf>,
    /// Core Data models.
    #[serde(default)]
    pub core_data_models: Vec<CoreDataModel>,
    /// Script build phases.
    #[serde(default)]
    pub scripts: Vec<TargetScript>,
    /// Declared dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<TargetDependency>,
    /// On-demand resource tags.
    #[serde(default)]
    pub on_demand_resources_tags: Option<OnDemandResourcesTags>,
}

impl Target {
    /// Creates a target with a bundle identifier derived from its name.
    #[must_use]
    pub fn new(name: impl Into<String>, platform: Platform, product: Product) -> Self {
        let name = name.into();
        Self {
            bundle_id: format!("dev.xcgraph.{name}"),
            name,
            platform,
            product,
            product_name: None,
            deployment_target: None,
            info_plist: None,
            entitlements: None,
            settings: None,
            sources: Vec::new(),
            resources: Vec::new(),
            core_data_models: Vec::new(),
            scripts: Vec::new(),
            dependencies: Vec::new(),
            on_demand_resources_tags: None,
        }
    }

    /// Sets the bundle identifier.
    #[must_use]
    pub fn with_bundle_id(mut self, bundle_id: impl Into<String>) -> Self {
        self.bundle_id = bundle_id.into();
        self
    }

    /// Sets the product name.
    #[must_use]
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    /// Sets the deployment target.
    #[must_use]
    pub fn with_deployment_target(mut self, platform: Platform, version: impl Into<String>) -> Self {
        self.deployment_target = Some(DeploymentTarget {
            platform,
            version: version.into(),
        });
        self
    }

    /// Sets the Info.plist path.
    #[must_use]
    pub fn with_info_plist(mut self, path: impl Into<PathBuf>) -> Self {
        self.info_plist = Some(path.into());
        self
    }

    /// Sets the entitlements path.
    #[must_use]
    pub fn with_entitlements(mut self, path: impl Into<PathBuf>) -> Self {
        self.entitlements = Some(path.into());
        self
    }

    /// Sets target-level settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Adds a source file.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<SourceFile>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Adds a resource file.
    #[must_use]
    pub fn with_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources.push(path.into());
        self
    }

    /// Adds a Core Data model.
    #[must_use]
    pub fn with_core_data_model(
        mut self,
        path: impl Into<PathBuf>,
        current_version: impl Into<String>,
    ) -> Self {
        self.core_data_models.push(CoreDataModel {
            path: path.into(),
            current_version: current_version.into(),
        });
        self
    }

    /// Adds a script build phase.
    #[must_use]
    pub fn with_script(mut self, name: impl Into<String>) -> Self {
        self.scripts.push(TargetScript {
            name: name.into(),
            script: String::new(),
        });
        self
    }

    /// Adds a declared dependency.
    #[must_use]
    pub fn with_dependency(mut self, dependency: TargetDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Sets the on-demand resource tags.
    #[must_use]
    pub fn with_on_demand_resources_tags(mut self, tags: OnDemandResourcesTags) -> Self {
        self.on_demand_resources_tags = Some(tags);
        self
    }

    /// Product name, falling back to the target name.
    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.name)
    }

    /// File name of the built product, e.g. `Core.framework` or `libCore.a`.
    #[must_use]
    pub fn product_name_with_extension(&self) -> String {
        let name = self.product_name();
        match self.product {
            Product::StaticLibrary | Product::DynamicLibrary => {
                format!("lib{name}.{}", self.product.xcode_extension().unwrap_or_default())
            }
            product => match product.xcode_extension() {
                Some(extension) => format!("{name}.{extension}"),
                None => name.to_string(),
            },
        }
    }
}

impl From<&str> for SourceFile {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for SourceFile {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for SourceFile {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_name_defaults_to_target_name() {
        let target = Target::new("Core", Platform::Ios, Product::Framework);
        assert_eq!(target.product_name(), "Core");
        assert_eq!(target.product_name_with_extension(), "Core.framework");
    }

    #[test]
    fn library_product_names_carry_lib_prefix() {
        let target = Target::new("Core", Platform::Ios, Product::StaticLibrary);
        assert_eq!(target.product_name_with_extension(), "libCore.a");
    }

    #[test]
    fn command_line_tool_has_no_extension() {
        let target = Target::new("tool", Platform::MacOs, Product::CommandLineTool);
        assert_eq!(target.product_name_with_extension(), "tool");
    }

    #[test]
    fn core_data_current_version_path() {
        let model = CoreDataModel {
            path: PathBuf::from("/Model.xcdatamodeld"),
            current_version: "1.0.0".to_string(),
        };
        assert_eq!(
            model.current_version_path(),
            PathBuf::from("/Model.xcdatamodeld/1.0.0.xcdatamodel")
        );
    }

    #[test]
    fn dependency_kinds_deserialize_with_defaults() {
        let deps: Vec<TargetDependency> = serde_json::from_str(
            r#"[
                {"kind": "framework", "path": "/F.framework"},
                {"kind": "library", "path": "/libA.a"},
                {"kind": "xcframework", "path": "/X.xcframework"},
                {"kind": "sdk", "name": "libc++.tbd"}
            ]"#,
        )
        .unwrap();
        assert_eq!(deps[0], TargetDependency::framework("/F.framework"));
        assert_eq!(deps[1], TargetDependency::library("/libA.a"));
        assert_eq!(
            deps[2],
            TargetDependency::XcFramework {
                path: PathBuf::from("/X.xcframework"),
                linking: Linking::Dynamic,
            }
        );
        assert_eq!(deps[3], TargetDependency::sdk("libc++.tbd"));
    }

    #[test]
    fn dependency_diagnostic_names() {
        let sdk = TargetDependency::sdk("libc++.tbd");
        assert_eq!(sdk.type_name(), "sdk");
        assert_eq!(sdk.name(), "libc++.tbd");
        let project = TargetDependency::project("Core", "/Core");
        assert_eq!(project.type_name(), "project");
        assert_eq!(project.name(), "Core");
    }
}
