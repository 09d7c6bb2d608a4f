//! Value types describing resolved projects and targets.
//!
//! The model is produced by manifest loading and is never mutated while
//! linting.

mod platform;
mod project;
mod settings;
mod target;

pub use platform::{Platform, Product};
pub use project::{CodeCoverageMode, Package, Project, Scheme, TargetReference};
pub use settings::{BuildConfiguration, Configuration, Settings, Variant};
pub use target::{
    CodeGen, CoreDataModel, DeploymentTarget, Linking, OnDemandResourcesTags, SdkStatus,
    SourceFile, Target, TargetDependency, TargetScript,
};
