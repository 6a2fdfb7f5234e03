//! The analyzer boundary: everything this tool does not do itself.
//!
//! Command-grammar analysis, semantic resolution, identity caching, and
//! locale data all live behind [`Analyzer`]. The driver's contract with an
//! implementation: it receives document text plus a language id and returns
//! diagnostics, or `None` when the document could not be processed at all
//! (the driver skips such files silently). [`ServiceBuilder`] assembles the
//! stack for a run from client capabilities, a storage path, and loaded
//! extension analyzers.

use crate::models::{Output, Severity};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
/// Capability descriptor handed to analyzers at initialization.
pub struct ClientCapabilities {
    pub workspace_configuration: bool,
    pub dynamic_config_registration: bool,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        ClientCapabilities {
            workspace_configuration: true,
            dynamic_config_registration: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Languages the walk recognizes; files with any other extension are skipped
/// before their contents are read.
pub enum LangId {
    Mcfunction,
    Json,
}

impl LangId {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "mcfunction" => Some(LangId::Mcfunction),
            "json" => Some(LangId::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LangId::Mcfunction => "mcfunction",
            LangId::Json => "json",
        }
    }
}

/// An in-memory document handed to [`Analyzer::analyze`].
pub struct TextDocument {
    pub uri: PathBuf,
    pub lang_id: LangId,
    pub text: String,
}

/// Diagnostics produced for one analyzed document.
pub struct ParseOutcome {
    pub diagnostics: Vec<Output>,
}

/// The language-service seam.
///
/// `load_locale` and `update_cache` default to no-ops so lightweight
/// analyzers only implement `analyze`.
pub trait Analyzer: Sync {
    /// Load the locale used for diagnostic messages, with `fallback` as the
    /// secondary choice.
    fn load_locale(&self, _language: &str, _fallback: &str) {}

    /// Refresh cross-reference caches for `roots` before a run, so identity
    /// lookups during analysis see up-to-date state.
    fn update_cache(&self, _roots: &[PathBuf]) {}

    /// Analyze one document. `None` means the document was not processable;
    /// `Some` carries the diagnostics (possibly empty).
    fn analyze(&self, doc: &TextDocument) -> Option<ParseOutcome>;
}

/// Built-in analyzer: validates `.json` documents with the serde parser and
/// passes `.mcfunction` sources through untouched. Command-level analysis
/// belongs to extension analyzers.
pub struct JsonSyntaxAnalyzer;

impl Analyzer for JsonSyntaxAnalyzer {
    fn analyze(&self, doc: &TextDocument) -> Option<ParseOutcome> {
        let diagnostics = match doc.lang_id {
            LangId::Json => match serde_json::from_str::<serde_json::Value>(&doc.text) {
                Ok(_) => Vec::new(),
                Err(e) => vec![Output {
                    severity: Severity::Error,
                    message: format!("invalid JSON: {e}"),
                }],
            },
            LangId::Mcfunction => Vec::new(),
        };
        Some(ParseOutcome { diagnostics })
    }
}

/// Extension analyzers compiled into this binary. Mirrors a plugin-loading
/// step: the built-in syntax analyzer is itself just the first plugin.
pub fn load_plugins() -> Vec<Box<dyn Analyzer>> {
    vec![Box::new(JsonSyntaxAnalyzer)]
}

/// Assembles the analyzer stack for a run.
pub struct ServiceBuilder {
    capabilities: ClientCapabilities,
    storage_path: PathBuf,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl ServiceBuilder {
    pub fn new(storage_path: PathBuf) -> Self {
        ServiceBuilder {
            capabilities: ClientCapabilities::default(),
            storage_path,
            analyzers: Vec::new(),
        }
    }

    pub fn capabilities(mut self, capabilities: ClientCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn plugin(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzers.push(analyzer);
        self
    }

    pub fn plugins(mut self, analyzers: Vec<Box<dyn Analyzer>>) -> Self {
        self.analyzers.extend(analyzers);
        self
    }

    pub fn build(self) -> Service {
        Service {
            capabilities: self.capabilities,
            storage_path: self.storage_path,
            analyzers: self.analyzers,
        }
    }
}

/// The assembled service: loaded analyzers plus the run's storage location.
pub struct Service {
    capabilities: ClientCapabilities,
    storage_path: PathBuf,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Service {
    pub fn capabilities(&self) -> &ClientCapabilities {
        &self.capabilities
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Forward the locale choice to every analyzer.
    pub fn load_locale(&self, language: &str, fallback: &str) {
        for analyzer in &self.analyzers {
            analyzer.load_locale(language, fallback);
        }
    }

    /// Ensure the storage directory exists and let every analyzer refresh
    /// its caches against the discovered roots.
    pub fn update_cache(&self, roots: &[PathBuf]) {
        let _ = fs::create_dir_all(&self.storage_path);
        for analyzer in &self.analyzers {
            analyzer.update_cache(roots);
        }
    }

    /// Analyze one document across every loaded analyzer.
    ///
    /// Diagnostics are concatenated in analyzer order. `None` only when no
    /// analyzer could process the document.
    pub fn analyze(&self, doc: &TextDocument) -> Option<ParseOutcome> {
        let mut diagnostics = Vec::new();
        let mut processed = false;
        for analyzer in &self.analyzers {
            if let Some(mut outcome) = analyzer.analyze(doc) {
                processed = true;
                diagnostics.append(&mut outcome.diagnostics);
            }
        }
        processed.then_some(ParseOutcome { diagnostics })
    }
}
