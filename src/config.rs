//! Settings loading and effective configuration resolution.
//!
//! Two layers feed a run:
//! - `<workspace>/.vscode/settings.json`: a flat JSON document with
//!   dot-delimited keys (`"datapack.env.language"`). Keys are expanded into a
//!   nested document and the `datapack` subtree deserializes into
//!   [`DatapackConfig`]. Errors here are fatal to the run.
//! - `packlint.toml|yaml|yml` at the workspace root (or closest ancestor):
//!   tool defaults for the settings path, output mode, and storage path.
//!
//! Overrides precedence: CLI > config file > defaults.

use glob::Pattern;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
/// Validated `datapack` settings subtree.
pub struct DatapackConfig {
    pub env: EnvConfig,
    pub lint: LintConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
/// Environment settings under `datapack.env.*`.
pub struct EnvConfig {
    /// Locale for analyzer diagnostics (`en` fallback).
    pub language: String,
    /// Glob patterns excluding root-relative paths from the walk.
    pub exclude: Vec<String>,
    /// Glob patterns winning paths back from `exclude`.
    pub include: Vec<String>,
    /// Directory depth searched for datapack roots under the workspace.
    pub detection_depth: usize,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            language: "en".to_string(),
            exclude: Vec::new(),
            include: Vec::new(),
            detection_depth: 1,
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Lint rule settings under `datapack.lint.*`, carried opaquely for the
/// analyzer. This tool never interprets individual rules.
pub struct LintConfig {
    #[serde(flatten)]
    pub rules: Map<String, Json>,
}

impl DatapackConfig {
    /// Whether a relative path participates in discovery and the walk.
    ///
    /// `include` patterns win over `exclude`; a path matching neither list is
    /// included. Patterns match against `/`-separated relative paths.
    pub fn is_rel_included(&self, rel: &Path) -> bool {
        let rel = rel.to_string_lossy().replace('\\', "/");
        let matches = |patterns: &[String]| {
            patterns
                .iter()
                .any(|p| Pattern::new(p).map(|g| g.matches(&rel)).unwrap_or(false))
        };
        if matches(&self.env.include) {
            return true;
        }
        !matches(&self.env.exclude)
    }
}

#[derive(Debug)]
/// Fatal settings-load failures surfaced before any linting starts.
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read settings '{}': {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid settings '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Expand a flat dotted-key object into nested form.
///
/// `{"a.b.c": 1}` becomes `{"a": {"b": {"c": 1}}}`. A later key overwrites
/// any earlier value on the same path, and an intermediate non-object value
/// is replaced when a deeper path needs to descend through it. Path segments
/// are not validated; empty segments create empty-string keys.
pub fn expand_dotted(flat: &Map<String, Json>) -> Map<String, Json> {
    let mut out = Map::new();
    for (path, value) in flat {
        let segments: Vec<&str> = path.split('.').collect();
        let mut cursor = &mut out;
        for seg in &segments[..segments.len() - 1] {
            let slot = cursor
                .entry(seg.to_string())
                .or_insert_with(|| Json::Object(Map::new()));
            if !slot.is_object() {
                *slot = Json::Object(Map::new());
            }
            cursor = match slot {
                Json::Object(obj) => obj,
                _ => unreachable!("slot was just made an object"),
            };
        }
        cursor.insert(segments[segments.len() - 1].to_string(), value.clone());
    }
    out
}

/// Read and validate the datapack settings file.
///
/// Behaves like the VSCode `getConfiguration` API over a flat settings
/// document: dotted keys are expanded, then the `datapack` subtree is
/// deserialized. A settings file without a `datapack` subtree yields the
/// default configuration; a missing or malformed file is an error.
pub fn get_configuration(settings_path: &Path) -> Result<DatapackConfig, ConfigError> {
    let text = fs::read_to_string(settings_path).map_err(|source| ConfigError::Read {
        path: settings_path.to_path_buf(),
        source,
    })?;
    let flat: Map<String, Json> =
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: settings_path.to_path_buf(),
            source,
        })?;
    let nested = expand_dotted(&flat);
    let datapack = nested
        .get("datapack")
        .cloned()
        .unwrap_or_else(|| Json::Object(Map::new()));
    serde_json::from_value(datapack).map_err(|source| ConfigError::Parse {
        path: settings_path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Tool configuration loaded from `packlint.toml|yaml|yml`.
pub struct ToolConfig {
    /// Settings file path, relative to the workspace root.
    pub settings: Option<String>,
    /// Output mode: human|json|github.
    pub output: Option<String>,
    /// Analyzer storage directory, relative to the workspace root.
    pub storage: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration built once in `main` and passed down.
pub struct Effective {
    pub workspace_root: PathBuf,
    pub settings_path: PathBuf,
    pub output: String,
    pub storage_path: PathBuf,
}

/// Walk upward from `start` to detect the workspace root.
///
/// Stops when a `packlint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_workspace_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("packlint.toml").exists()
            || cur.join("packlint.yaml").exists()
            || cur.join("packlint.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ToolConfig` from `packlint.toml` or `packlint.yaml|yml` if present.
pub fn load_tool_config(root: &Path) -> Option<ToolConfig> {
    let toml_path = root.join("packlint.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: ToolConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["packlint.yaml", "packlint.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: ToolConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_workspace_root: Option<&str>,
    cli_settings: Option<&str>,
    cli_output: Option<&str>,
    cli_storage: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_workspace_root.unwrap_or("."));
    let workspace_root = match cli_workspace_root {
        // An explicit root is taken as-is; only the implicit default walks up.
        Some(_) => start,
        None => detect_workspace_root(&start),
    };
    let cfg = load_tool_config(&workspace_root).unwrap_or_default();

    let settings = cli_settings
        .map(|s| s.to_string())
        .or(cfg.settings)
        .unwrap_or_else(|| ".vscode/settings.json".to_string());
    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let storage = cli_storage
        .map(|s| s.to_string())
        .or(cfg.storage)
        .unwrap_or_else(|| "_storage".to_string());

    Effective {
        settings_path: workspace_root.join(settings),
        storage_path: workspace_root.join(storage),
        workspace_root,
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_expand_dotted_nests_shared_prefixes() {
        let flat: Map<String, Json> = serde_json::from_str(r#"{"a.b.c": 1, "a.b.d": 2}"#).unwrap();
        let nested = expand_dotted(&flat);
        assert_eq!(Json::Object(nested), json!({"a": {"b": {"c": 1, "d": 2}}}));
    }

    #[test]
    fn test_expand_dotted_duplicate_path_last_write_wins() {
        // serde_json keeps the later value for a repeated key
        let flat: Map<String, Json> = serde_json::from_str(r#"{"a.b": 1, "a.b": 2}"#).unwrap();
        let nested = expand_dotted(&flat);
        assert_eq!(Json::Object(nested), json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_expand_dotted_deep_write_replaces_scalar() {
        let flat: Map<String, Json> = serde_json::from_str(r#"{"a.b": 5, "a.b.c": 1}"#).unwrap();
        let nested = expand_dotted(&flat);
        assert_eq!(Json::Object(nested), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_get_configuration_extracts_datapack_subtree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            "{}",
            r#"{
                "editor.tabSize": 4,
                "datapack.env.language": "ja",
                "datapack.env.exclude": ["data/secret/**"],
                "datapack.lint.nameOfTags": "warning"
            }"#
        )
        .unwrap();

        let config = get_configuration(&path).unwrap();
        assert_eq!(config.env.language, "ja");
        assert_eq!(config.env.exclude, vec!["data/secret/**".to_string()]);
        assert_eq!(config.env.detection_depth, 1);
        assert_eq!(
            config.lint.rules.get("nameOfTags"),
            Some(&Json::String("warning".into()))
        );
    }

    #[test]
    fn test_get_configuration_without_datapack_keys_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"editor.tabSize": 4}"#).unwrap();
        let config = get_configuration(&path).unwrap();
        assert_eq!(config.env.language, "en");
        assert!(config.env.exclude.is_empty());
    }

    #[test]
    fn test_get_configuration_errors_are_fatal() {
        let dir = tempdir().unwrap();
        let missing = get_configuration(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let malformed = get_configuration(&path);
        assert!(matches!(malformed, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_is_rel_included_exclude_and_include() {
        let mut config = DatapackConfig::default();
        config.env.exclude = vec!["data/gen/**".into()];
        config.env.include = vec!["data/gen/keep/**".into()];
        assert!(config.is_rel_included(Path::new("data/ns/functions/a.mcfunction")));
        assert!(!config.is_rel_included(Path::new("data/gen/ns/functions/a.mcfunction")));
        assert!(config.is_rel_included(Path::new("data/gen/keep/functions/a.mcfunction")));
    }

    #[test]
    fn test_resolve_effective_from_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("packlint.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
settings = "ci/settings.json"
output = "github"
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.workspace_root, root);
        assert_eq!(eff.settings_path, root.join("ci/settings.json"));
        assert_eq!(eff.output, "github");
        assert_eq!(eff.storage_path, root.join("_storage"));
    }

    #[test]
    fn test_resolve_effective_cli_over_yaml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("packlint.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output: json
storage: .cache/packlint
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, Some("human"), None);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.storage_path, root.join(".cache/packlint"));
        assert_eq!(eff.settings_path, root.join(".vscode/settings.json"));
    }
}
