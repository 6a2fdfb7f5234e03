//! Check runner: walks every datapack root, analyzes recognized files, and
//! accumulates diagnostics per registry category.
//!
//! Roots are processed in parallel; each walk fills a private accumulator
//! and the results are merged only after every root has finished, so no
//! shared mutable state exists during traversal and report order is stable.

use crate::config::DatapackConfig;
use crate::models::{
    fail_count, merge, safe_messages, CheckReport, LintingData, MessageData,
};
use crate::pack::Identity;
use crate::service::{LangId, Service, TextDocument};
use crate::walk;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Run one check over the given roots.
///
/// Refreshes the service cache first, then walks each root's `data` subtree.
/// Per-file failures (unreadable, unprocessable, or identity-less files) are
/// silent skips; diagnostics are never fatal and every file is linted before
/// the counts are computed.
pub fn run_check(
    service: &Service,
    workspace: &Path,
    roots: &[PathBuf],
    config: &DatapackConfig,
) -> CheckReport {
    service.update_cache(roots);

    let per_root: Vec<LintingData> = roots
        .par_iter()
        .map(|root| lint_root(service, workspace, root, config))
        .collect();

    let mut data = LintingData::new();
    for part in per_root {
        merge(&mut data, part);
    }
    let fail = fail_count(&data);
    CheckReport {
        roots: roots.to_vec(),
        data,
        fail,
    }
}

/// Walk one root's `data` tree and collect its diagnostics.
fn lint_root(
    service: &Service,
    workspace: &Path,
    root: &Path,
    config: &DatapackConfig,
) -> LintingData {
    let mut data = LintingData::new();
    let files = walk::walk_files(root, &root.join("data"), |rel| config.is_rel_included(rel));
    for (path, rel) in files {
        let Some(lang_id) = LangId::from_path(&path) else {
            continue;
        };
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        let doc = TextDocument {
            uri: path.clone(),
            lang_id,
            text,
        };
        let Some(outcome) = service.analyze(&doc) else {
            continue;
        };
        let Some(identity) = Identity::from_rel(&rel) else {
            continue;
        };
        let title = message_title(&identity, workspace, &path);
        safe_messages(&mut data, identity.category).push(MessageData {
            title,
            messages: outcome.diagnostics,
        });
    }
    data
}

/// Title for one linted file: the stable resource id plus a
/// workspace-relative path that stays actionable in CI logs.
fn message_title(identity: &Identity, workspace: &Path, path: &Path) -> String {
    let display = pathdiff::diff_paths(path, workspace).unwrap_or_else(|| path.to_path_buf());
    format!(
        "{} ({})",
        identity.id,
        display.to_string_lossy().replace('\\', "/")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::Category;
    use crate::service::{load_plugins, ServiceBuilder};
    use tempfile::tempdir;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_unrecognized_extensions_never_contribute() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        let root = ws.join("pack");
        write(&root.join("data/ns/functions/readme.txt"), "not a function");
        write(&root.join("data/ns/functions/a.mcfunction"), "say a");

        let service = ServiceBuilder::new(ws.join("_storage"))
            .plugins(load_plugins())
            .build();
        let report = run_check(
            &service,
            ws,
            &[root],
            &DatapackConfig::default(),
        );
        let entries = report.data.get(&Category::Functions).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].title.starts_with("ns:a "));
    }

    #[test]
    fn test_files_without_identity_are_skipped() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        let root = ws.join("pack");
        // Unknown registry directory: analyzable but identity-less
        write(&root.join("data/ns/shaders/a.json"), "{}");

        let service = ServiceBuilder::new(ws.join("_storage"))
            .plugins(load_plugins())
            .build();
        let report = run_check(&service, ws, &[root], &DatapackConfig::default());
        assert!(report.data.is_empty());
        assert_eq!(report.fail.total(), 0);
    }

    #[test]
    fn test_malformed_json_counts_one_error() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        let root = ws.join("pack");
        write(&root.join("data/ns/recipes/bad.json"), "{oops");
        write(&root.join("data/ns/recipes/good.json"), "{\"type\": \"x\"}");

        let service = ServiceBuilder::new(ws.join("_storage"))
            .plugins(load_plugins())
            .build();
        let report = run_check(&service, ws, &[root], &DatapackConfig::default());
        assert_eq!(report.fail.error, 1);
        assert_eq!(report.fail.warning, 0);
        assert_eq!(report.data.get(&Category::Recipes).unwrap().len(), 2);
    }

    #[test]
    fn test_results_merge_across_roots_in_order() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        let alpha = ws.join("alpha");
        let beta = ws.join("beta");
        write(&alpha.join("data/ns/functions/a.mcfunction"), "say a");
        write(&beta.join("data/ns/functions/b.mcfunction"), "say b");

        let service = ServiceBuilder::new(ws.join("_storage"))
            .plugins(load_plugins())
            .build();
        let report = run_check(
            &service,
            ws,
            &[alpha, beta],
            &DatapackConfig::default(),
        );
        let titles: Vec<_> = report
            .data
            .get(&Category::Functions)
            .unwrap()
            .iter()
            .map(|m| m.title.clone())
            .collect();
        assert_eq!(
            titles,
            vec![
                "ns:a (alpha/data/ns/functions/a.mcfunction)",
                "ns:b (beta/data/ns/functions/b.mcfunction)"
            ]
        );
    }
}
