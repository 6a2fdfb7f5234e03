//! Datapack root discovery and resource identity resolution.
//!
//! A datapack root is a directory carrying a `pack.mcmeta` file or a `data`
//! subdirectory. Resource identities come from root-relative paths:
//! `data/<namespace>/<category>/<path...>.<ext>` resolves to
//! `namespace:path` grouped under the registry category.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::config::DatapackConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
/// Registry categories recognized under `data/<namespace>/`.
pub enum Category {
    Advancements,
    Dimension,
    DimensionType,
    Functions,
    ItemModifiers,
    LootTables,
    Predicates,
    Recipes,
    Structures,
    Tags,
    Worldgen,
}

impl Category {
    /// Map the directory segment after the namespace to a category.
    pub fn from_dir(dir: &str) -> Option<Self> {
        match dir {
            "advancements" => Some(Category::Advancements),
            "dimension" => Some(Category::Dimension),
            "dimension_type" => Some(Category::DimensionType),
            "functions" => Some(Category::Functions),
            "item_modifiers" => Some(Category::ItemModifiers),
            "loot_tables" => Some(Category::LootTables),
            "predicates" => Some(Category::Predicates),
            "recipes" => Some(Category::Recipes),
            "structures" => Some(Category::Structures),
            "tags" => Some(Category::Tags),
            "worldgen" => Some(Category::Worldgen),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Advancements => "advancements",
            Category::Dimension => "dimension",
            Category::DimensionType => "dimension_type",
            Category::Functions => "functions",
            Category::ItemModifiers => "item_modifiers",
            Category::LootTables => "loot_tables",
            Category::Predicates => "predicates",
            Category::Recipes => "recipes",
            Category::Structures => "structures",
            Category::Tags => "tags",
            Category::Worldgen => "worldgen",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Vanilla resource-location charset: lowercase alphanumerics plus `_.-`,
// with `/` separating path segments.
static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.-]+$").expect("namespace charset"));
static RES_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.-]+(/[a-z0-9_.-]+)*$").expect("path charset"));

#[derive(Debug, Clone, PartialEq, Eq)]
/// A resolved resource identity: `namespace:path` plus its registry category.
pub struct Identity {
    pub id: String,
    pub category: Category,
}

impl Identity {
    /// Resolve an identity from a root-relative file path.
    ///
    /// Returns `None` for paths outside `data`, with too few segments, an
    /// unknown category, a missing extension, or characters outside the
    /// vanilla charset. Such files are skipped by the walk.
    pub fn from_rel(rel: &Path) -> Option<Self> {
        let parts: Vec<&str> = rel
            .components()
            .map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        // data/<namespace>/<category>/<name>.<ext> is the shortest valid shape
        if parts.len() < 4 || parts[0] != "data" {
            return None;
        }
        let namespace = parts[1];
        let category = Category::from_dir(parts[2])?;
        let (stem, _ext) = parts.last()?.rsplit_once('.')?;
        let mut segments: Vec<&str> = parts[3..parts.len() - 1].to_vec();
        segments.push(stem);
        let res_path = segments.join("/");
        if !NAMESPACE_RE.is_match(namespace) || !RES_PATH_RE.is_match(&res_path) {
            return None;
        }
        Some(Identity {
            id: format!("{namespace}:{res_path}"),
            category,
        })
    }
}

/// Discover datapack roots under `workspace`.
///
/// A directory qualifies when it holds a `pack.mcmeta` file or a `data`
/// directory. The search is bounded by `env.detection_depth` and honors the
/// config's exclusion patterns (matched against workspace-relative paths).
/// Results are in sorted traversal order.
pub fn find_datapack_roots(workspace: &Path, config: &DatapackConfig) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    for entry in WalkDir::new(workspace)
        .max_depth(config.env.detection_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() {
                return false;
            }
            match e.path().strip_prefix(workspace) {
                Ok(rel) => rel.as_os_str().is_empty() || config.is_rel_included(rel),
                Err(_) => false,
            }
        })
    {
        let Ok(entry) = entry else { continue };
        let dir = entry.path();
        if dir.join("pack.mcmeta").is_file() || dir.join("data").is_dir() {
            roots.push(dir.to_path_buf());
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_identity_from_function_path() {
        let id = Identity::from_rel(Path::new("data/ns/functions/foo/bar.mcfunction")).unwrap();
        assert_eq!(id.id, "ns:foo/bar");
        assert_eq!(id.category, Category::Functions);
    }

    #[test]
    fn test_identity_from_top_level_resource() {
        let id = Identity::from_rel(Path::new("data/mypack/advancements/root.json")).unwrap();
        assert_eq!(id.id, "mypack:root");
        assert_eq!(id.category, Category::Advancements);
    }

    #[test]
    fn test_identity_rejects_malformed_paths() {
        // Outside data
        assert!(Identity::from_rel(Path::new("assets/ns/functions/a.mcfunction")).is_none());
        // Too few segments
        assert!(Identity::from_rel(Path::new("data/ns/a.mcfunction")).is_none());
        // Unknown category
        assert!(Identity::from_rel(Path::new("data/ns/shaders/a.json")).is_none());
        // No extension
        assert!(Identity::from_rel(Path::new("data/ns/functions/a")).is_none());
        // Uppercase violates the charset
        assert!(Identity::from_rel(Path::new("data/NS/functions/a.mcfunction")).is_none());
        assert!(Identity::from_rel(Path::new("data/ns/functions/Foo.mcfunction")).is_none());
    }

    #[test]
    fn test_find_roots_by_mcmeta_and_data() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        fs::create_dir_all(ws.join("alpha/data/ns/functions")).unwrap();
        fs::create_dir_all(ws.join("beta")).unwrap();
        fs::write(ws.join("beta/pack.mcmeta"), "{}").unwrap();
        fs::create_dir_all(ws.join("plain")).unwrap();

        let roots = find_datapack_roots(ws, &DatapackConfig::default());
        let names: Vec<_> = roots
            .iter()
            .map(|r| r.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_find_roots_honors_exclude_patterns() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        fs::create_dir_all(ws.join("keep/data")).unwrap();
        fs::create_dir_all(ws.join("skip/data")).unwrap();

        let mut config = DatapackConfig::default();
        config.env.exclude = vec!["skip".into()];
        let roots = find_datapack_roots(ws, &config);
        assert_eq!(roots, vec![ws.join("keep")]);
    }

    #[test]
    fn test_find_roots_workspace_itself_qualifies() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        fs::create_dir_all(ws.join("data/ns/recipes")).unwrap();
        let roots = find_datapack_roots(ws, &DatapackConfig::default());
        assert_eq!(roots, vec![ws.to_path_buf()]);
    }
}
