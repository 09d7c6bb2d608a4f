//! Finds the configuration for a graph and folds command-line overrides in.
//!
//! A graph description usually lives in a build directory while the
//! configuration is checked in at the workspace root, so both places are
//! searched:
//!
//! 1. `--config <path>`, which must exist
//! 2. `xcgraph-lint.toml` or `.xcgraph-lint.toml` beside the graph file
//! 3. the same names in the graph's root directory (its `path` field)
//! 4. `config.toml` in `$XCGRAPH_LINT_CONFIG_DIR`, else `~/.xcgraph-lint/`
//! 5. built-in defaults

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use xcgraph_lint::{resolve_fail_on, Config, Graph, Severity};

/// Config file names looked up in a directory, in order.
const CONFIG_NAMES: &[&str] = &["xcgraph-lint.toml", ".xcgraph-lint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Where the configuration of a check run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Passed with `--config`.
    Flag(PathBuf),
    /// Found beside the graph file.
    GraphFile(PathBuf),
    /// Found in the graph's root directory.
    GraphRoot(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Defaults,
}

impl ConfigOrigin {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::GraphFile(p) | Self::GraphRoot(p) | Self::Global(p) => Some(p),
            Self::Defaults => None,
        }
    }
}

/// Command-line flags that take precedence over the configuration file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// `--fail-on`.
    pub fail_on: Option<Severity>,
    /// `--disable-bundle-accessors`.
    pub disable_bundle_accessors: bool,
}

/// Effective settings of a check run.
#[derive(Debug)]
pub struct CheckSettings {
    /// Configuration with overrides applied.
    pub config: Config,
    /// Lowest severity failing the run.
    pub fail_on: Severity,
    /// Where `config` was read from.
    pub origin: ConfigOrigin,
}

/// Search locations for the configuration of one graph.
#[derive(Debug, Clone)]
pub struct ConfigLookup {
    explicit: Option<PathBuf>,
    graph_dir: PathBuf,
    graph_root: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl ConfigLookup {
    /// Lookup for `graph`, loaded from `graph_file`.
    #[must_use]
    pub fn for_graph(graph_file: &Path, graph: &Graph, explicit: Option<&Path>) -> Self {
        let graph_dir = graph_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let graph_root = Some(graph.path())
            .filter(|root| !root.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Self {
            explicit: explicit.map(Path::to_path_buf),
            graph_dir,
            graph_root,
            global_dir: global_config_dir(),
        }
    }

    /// Finds the first existing configuration file.
    #[must_use]
    pub fn find(&self) -> ConfigOrigin {
        if let Some(path) = &self.explicit {
            return ConfigOrigin::Flag(path.clone());
        }
        if let Some(path) = config_in(&self.graph_dir) {
            return ConfigOrigin::GraphFile(path);
        }
        if let Some(path) = self
            .graph_root
            .as_deref()
            .filter(|root| *root != self.graph_dir)
            .and_then(config_in)
        {
            return ConfigOrigin::GraphRoot(path);
        }
        self.global_dir
            .as_deref()
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|path| path.is_file())
            .map_or(ConfigOrigin::Defaults, ConfigOrigin::Global)
    }

    /// Loads the configuration found and applies `overrides` to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn settings(&self, overrides: Overrides) -> Result<CheckSettings> {
        let origin = self.find();
        let mut config = match origin.path() {
            Some(path) => {
                tracing::debug!("Using config: {}", path.display());
                Config::from_file(path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?
            }
            None => Config::default(),
        };
        if overrides.disable_bundle_accessors {
            config.linter.disable_bundle_accessors = true;
        }
        let fail_on = resolve_fail_on(overrides.fail_on, &config);
        Ok(CheckSettings {
            config,
            fail_on,
            origin,
        })
    }
}

fn config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Global config directory: `$XCGRAPH_LINT_CONFIG_DIR`, else `~/.xcgraph-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XCGRAPH_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".xcgraph-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// A workspace root holding a build directory, plus an empty global dir.
    struct Layout {
        root: TempDir,
        global: TempDir,
    }

    impl Layout {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            fs::create_dir(root.path().join("build")).unwrap();
            Self {
                root,
                global: TempDir::new().unwrap(),
            }
        }

        fn build_dir(&self) -> PathBuf {
            self.root.path().join("build")
        }

        fn lookup(&self, explicit: Option<&Path>) -> ConfigLookup {
            ConfigLookup {
                explicit: explicit.map(Path::to_path_buf),
                graph_dir: self.build_dir(),
                graph_root: Some(self.root.path().to_path_buf()),
                global_dir: Some(self.global.path().to_path_buf()),
            }
        }
    }

    #[test]
    fn graph_directory_wins_over_graph_root() {
        let layout = Layout::new();
        fs::write(layout.root.path().join("xcgraph-lint.toml"), "").unwrap();
        assert_eq!(
            layout.lookup(None).find(),
            ConfigOrigin::GraphRoot(layout.root.path().join("xcgraph-lint.toml"))
        );

        fs::write(layout.build_dir().join(".xcgraph-lint.toml"), "").unwrap();
        assert_eq!(
            layout.lookup(None).find(),
            ConfigOrigin::GraphFile(layout.build_dir().join(".xcgraph-lint.toml"))
        );
    }

    #[test]
    fn global_config_is_the_last_resort() {
        let layout = Layout::new();
        assert_eq!(layout.lookup(None).find(), ConfigOrigin::Defaults);

        let global = layout.global.path().join("config.toml");
        fs::write(&global, "").unwrap();
        assert_eq!(layout.lookup(None).find(), ConfigOrigin::Global(global));
    }

    #[test]
    fn flag_overrides_every_location_and_must_exist() {
        let layout = Layout::new();
        fs::write(layout.build_dir().join("xcgraph-lint.toml"), "").unwrap();
        let missing = layout.root.path().join("custom.toml");

        let lookup = layout.lookup(Some(&missing));
        assert_eq!(lookup.find(), ConfigOrigin::Flag(missing));
        let err = lookup.settings(Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load config"));
    }

    #[test]
    fn overrides_apply_on_top_of_the_file() {
        let layout = Layout::new();
        fs::write(
            layout.root.path().join("xcgraph-lint.toml"),
            "fail_on = \"warning\"\n\n[linter]\nparallel = false\n",
        )
        .unwrap();

        let from_file = layout.lookup(None).settings(Overrides::default()).unwrap();
        assert_eq!(from_file.fail_on, Severity::Warning);
        assert!(!from_file.config.linter.parallel);
        assert!(!from_file.config.linter.disable_bundle_accessors);

        let overridden = layout
            .lookup(None)
            .settings(Overrides {
                fail_on: Some(Severity::Error),
                disable_bundle_accessors: true,
            })
            .unwrap();
        assert_eq!(overridden.fail_on, Severity::Error);
        assert!(overridden.config.linter.disable_bundle_accessors);
        assert!(!overridden.config.linter.parallel);
    }

    #[test]
    fn defaults_when_nothing_is_found() {
        let layout = Layout::new();
        let settings = layout.lookup(None).settings(Overrides::default()).unwrap();
        assert_eq!(settings.origin, ConfigOrigin::Defaults);
        assert_eq!(settings.fail_on, Severity::Error);
    }

    #[test]
    fn lookup_uses_the_graph_root_path() {
        let layout = Layout::new();
        let graph = Graph::builder().path(layout.root.path()).build().unwrap();
        let lookup = ConfigLookup::for_graph(&layout.build_dir().join("graph.json"), &graph, None);
        assert_eq!(lookup.graph_dir, layout.build_dir());
        assert_eq!(lookup.graph_root.as_deref(), Some(layout.root.path()));

        let rootless = Graph::builder().build().unwrap();
        let lookup = ConfigLookup::for_graph(Path::new("graph.json"), &rootless, None);
        assert_eq!(lookup.graph_dir, PathBuf::from("."));
        assert!(lookup.graph_root.is_none());
    }
}
