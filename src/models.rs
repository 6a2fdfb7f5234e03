//! Shared data models for check results: severities, per-file diagnostics,
//! and the per-category accumulator consumed by the printers.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::pack::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Diagnostic severity attached to each reported message.
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
            Severity::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
/// One diagnostic produced for a linted file.
pub struct Output {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
/// All diagnostics for a single linted file. `title` identifies the file
/// (resource id plus workspace-relative path).
pub struct MessageData {
    pub title: String,
    pub messages: Vec<Output>,
}

/// Accumulated check results keyed by registry category. `BTreeMap` keeps
/// report order stable across runs.
pub type LintingData = BTreeMap<Category, Vec<MessageData>>;

/// Access the message list for `category`, inserting an empty list on first
/// use. Repeated calls return the same slot, so callers append without
/// re-inserting.
pub fn safe_messages(data: &mut LintingData, category: Category) -> &mut Vec<MessageData> {
    data.entry(category).or_default()
}

/// Append every entry of `other` onto `data`, preserving per-category
/// grouping and insertion order.
pub fn merge(data: &mut LintingData, other: LintingData) {
    for (category, mut entries) in other {
        safe_messages(data, category).append(&mut entries);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
/// Error/warning totals summed over every output of a run. Information and
/// hint severities are reported but never counted.
pub struct FailCount {
    pub error: usize,
    pub warning: usize,
}

impl FailCount {
    pub fn total(&self) -> usize {
        self.error + self.warning
    }
}

/// Count error- and warning-severity outputs across all categories.
pub fn fail_count(data: &LintingData) -> FailCount {
    let mut count = FailCount::default();
    for entries in data.values() {
        for entry in entries {
            for out in &entry.messages {
                match out.severity {
                    Severity::Error => count.error += 1,
                    Severity::Warning => count.warning += 1,
                    _ => {}
                }
            }
        }
    }
    count
}

/// Full result of one check run. The caller decides the exit status; the
/// runner never touches process state.
pub struct CheckReport {
    pub roots: Vec<PathBuf>,
    pub data: LintingData,
    pub fail: FailCount,
}
