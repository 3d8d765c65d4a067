//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/evotree/evotree.toml`
//! 3. Explicit config: `--config <file>`
//! 4. Environment variables: `EVOTREE_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::options::TreeChartSettings;
use crate::application::{ApplicationError, Source};
use crate::domain::symbol::{DEFAULT_SYMBOL_SIZE, LEAF_SYMBOL_SIZE, ROOT_SYMBOL_SIZE};
use crate::domain::{SymbolSizePolicy, DEFAULT_INITIAL_DEPTH, DEFAULT_MAX_DESC_LEN};

/// Tree view behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeConfig {
    /// Nodes up to this depth start expanded
    pub initial_depth: usize,
    /// Characters of `desc` kept in a tooltip
    pub max_desc_len: usize,
    pub animation_duration: u64,
    pub animation_duration_update: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let chart = TreeChartSettings::default();
        Self {
            initial_depth: DEFAULT_INITIAL_DEPTH,
            max_desc_len: DEFAULT_MAX_DESC_LEN,
            animation_duration: chart.animation_duration,
            animation_duration_update: chart.animation_duration_update,
        }
    }
}

impl TreeConfig {
    pub fn chart_settings(&self) -> TreeChartSettings {
        TreeChartSettings {
            initial_depth: self.initial_depth,
            animation_duration: self.animation_duration,
            animation_duration_update: self.animation_duration_update,
        }
    }
}

/// Marker sizes per node role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SymbolConfig {
    pub root: f64,
    pub leaf: f64,
    pub default: f64,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            root: ROOT_SYMBOL_SIZE,
            leaf: LEAF_SYMBOL_SIZE,
            default: DEFAULT_SYMBOL_SIZE,
        }
    }
}

impl From<&SymbolConfig> for SymbolSizePolicy {
    fn from(config: &SymbolConfig) -> Self {
        SymbolSizePolicy {
            root: config.root,
            leaf: config.leaf,
            default: config.default,
        }
    }
}

/// Raw tree section: every field optional so a layer only overrides what it names.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTreeConfig {
    pub initial_depth: Option<usize>,
    pub max_desc_len: Option<usize>,
    pub animation_duration: Option<u64>,
    pub animation_duration_update: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSymbolConfig {
    pub root: Option<f64>,
    pub leaf: Option<f64>,
    pub default: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub tree_file: Option<String>,
    pub dashboard_file: Option<String>,
    pub base_url: Option<String>,
    pub editor: Option<String>,
    pub tree: RawTreeConfig,
    pub symbol: RawSymbolConfig,
}

/// Unified configuration for evotree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the JSON payloads
    pub data_dir: PathBuf,
    pub tree_file: String,
    pub dashboard_file: String,
    /// When set, payloads are fetched from `<base_url>/<file>` instead of `data_dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Editor command (default: $EDITOR or "vim")
    pub editor: String,
    pub tree: TreeConfig,
    pub symbol: SymbolConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".into());

        Self {
            data_dir: PathBuf::from("./public/data"),
            tree_file: "evolution_tree.json".into(),
            dashboard_file: "dashboard_data.json".into(),
            base_url: None,
            editor,
            tree: TreeConfig::default(),
            symbol: SymbolConfig::default(),
        }
    }
}

/// Get the XDG config directory for evotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "evotree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("evotree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables are left as written.
fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Settings {
    /// Location of the tree payload.
    pub fn tree_source(&self) -> Source {
        self.source_for(&self.tree_file)
    }

    /// Location of the dashboard payload.
    pub fn dashboard_source(&self) -> Source {
        self.source_for(&self.dashboard_file)
    }

    fn source_for(&self, file: &str) -> Source {
        match &self.base_url {
            Some(base) => Source::Url(format!("{}/{}", base.trim_end_matches('/'), file)),
            None => Source::File(self.data_dir.join(file)),
        }
    }

    pub fn symbol_policy(&self) -> SymbolSizePolicy {
        SymbolSizePolicy::from(&self.symbol)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = PathBuf::from(expand(self.data_dir.to_string_lossy().as_ref()));
        self.editor = expand(&self.editor);
    }

    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            tree_file: overlay
                .tree_file
                .clone()
                .unwrap_or_else(|| self.tree_file.clone()),
            dashboard_file: overlay
                .dashboard_file
                .clone()
                .unwrap_or_else(|| self.dashboard_file.clone()),
            base_url: overlay.base_url.clone().or_else(|| self.base_url.clone()),
            editor: overlay
                .editor
                .clone()
                .unwrap_or_else(|| self.editor.clone()),
            tree: TreeConfig {
                initial_depth: overlay.tree.initial_depth.unwrap_or(self.tree.initial_depth),
                max_desc_len: overlay.tree.max_desc_len.unwrap_or(self.tree.max_desc_len),
                animation_duration: overlay
                    .tree
                    .animation_duration
                    .unwrap_or(self.tree.animation_duration),
                animation_duration_update: overlay
                    .tree
                    .animation_duration_update
                    .unwrap_or(self.tree.animation_duration_update),
            },
            symbol: SymbolConfig {
                root: overlay.symbol.root.unwrap_or(self.symbol.root),
                leaf: overlay.symbol.leaf.unwrap_or(self.symbol.leaf),
                default: overlay.symbol.default.unwrap_or(self.symbol.default),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `explicit` is a file given on the command line; unlike the global
    /// file it must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = explicit {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply EVOTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("EVOTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            data_dir: config.get_string("data_dir").ok().map(PathBuf::from),
            tree_file: config.get_string("tree_file").ok(),
            dashboard_file: config.get_string("dashboard_file").ok(),
            base_url: config.get_string("base_url").ok(),
            editor: config.get_string("editor").ok(),
            tree: RawTreeConfig {
                initial_depth: env_number(&config, "tree.initial_depth")?,
                max_desc_len: env_number(&config, "tree.max_desc_len")?,
                animation_duration: env_number(&config, "tree.animation_duration")?,
                animation_duration_update: env_number(&config, "tree.animation_duration_update")?,
            },
            symbol: RawSymbolConfig {
                root: env_float(&config, "symbol.root")?,
                leaf: env_float(&config, "symbol.leaf")?,
                default: env_float(&config, "symbol.default")?,
            },
        };

        Ok(settings.merge_with(&raw))
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# evotree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/evotree/evotree.toml
#   Explicit: evotree --config <file>
#   Env:      EVOTREE_* variables, sections joined with "__"
#             (e.g. EVOTREE_TREE__INITIAL_DEPTH=3)

# Directory holding evolution_tree.json and dashboard_data.json
# data_dir = "./public/data"

# tree_file = "evolution_tree.json"
# dashboard_file = "dashboard_data.json"

# Fetch payloads over HTTP instead of reading data_dir
# base_url = "http://localhost:5173/data"

# editor = "vim"

[tree]
# Nodes up to this depth start expanded (root is depth 0)
# initial_depth = 2

# Characters of a model description kept in its tooltip
# max_desc_len = 150

# animation_duration = 550
# animation_duration_update = 750

[symbol]
# root = 40
# leaf = 10
# default = 15
"#
        .to_string()
    }
}

/// Unset keys read as `None`; set but unparsable keys are an error.
fn env_number<T: std::str::FromStr>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get_string(key) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| ApplicationError::Config {
            message: format!("{key}: expected a non-negative integer, got '{value}'"),
        }),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn env_float(config: &Config, key: &str) -> Result<Option<f64>, ApplicationError> {
    match config.get_string(key) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| ApplicationError::Config {
            message: format!("{key}: expected a number, got '{value}'"),
        }),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_match_viewer_constants() {
        let settings = Settings::default();

        assert_eq!(settings.data_dir, PathBuf::from("./public/data"));
        assert_eq!(settings.tree.initial_depth, 2);
        assert_eq!(settings.tree.max_desc_len, 150);
        assert_eq!(settings.symbol_policy(), SymbolSizePolicy::default());
        assert!(!settings.editor.is_empty());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_named_fields_change() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str(
            r#"
            tree_file = "tree.json"
            [tree]
            initial_depth = 4
            [symbol]
            leaf = 6
            "#,
        )
        .unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.tree_file, "tree.json");
        assert_eq!(merged.dashboard_file, base.dashboard_file);
        assert_eq!(merged.tree.initial_depth, 4);
        assert_eq!(merged.tree.max_desc_len, 150);
        assert_eq!(merged.symbol.leaf, 6.0);
        assert_eq!(merged.symbol.root, 40.0);
    }

    #[test]
    fn given_base_url_when_resolving_sources_then_urls_are_joined() {
        let settings = Settings {
            base_url: Some("http://localhost:5173/data/".into()),
            ..Settings::default()
        };

        assert_eq!(
            settings.tree_source(),
            Source::Url("http://localhost:5173/data/evolution_tree.json".into())
        );
        assert_eq!(
            settings.dashboard_source(),
            Source::Url("http://localhost:5173/data/dashboard_data.json".into())
        );
    }

    #[test]
    fn given_no_base_url_when_resolving_sources_then_files_under_data_dir() {
        let settings = Settings {
            data_dir: PathBuf::from("/srv/data"),
            ..Settings::default()
        };

        assert_eq!(
            settings.tree_source(),
            Source::File(PathBuf::from("/srv/data/evolution_tree.json"))
        );
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/evotree/data"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_dir = settings.data_dir.to_string_lossy();
        assert!(data_dir.starts_with(&home), "data_dir: {}", data_dir);
        assert!(!data_dir.contains('~'));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();

        assert!(raw.data_dir.is_none());
        assert!(raw.tree.initial_depth.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_raw() {
        let settings = Settings::default();

        let raw: RawSettings = toml::from_str(&settings.to_toml().unwrap()).unwrap();

        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
