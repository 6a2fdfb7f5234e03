//! Report rendering for check runs.
//!
//! Supports `human` (default), `json`, and `github` outputs. The JSON form
//! carries per-category results and a top-level summary; the GitHub form
//! emits workflow commands (`::group::`, `::error::`, `::warning::`) so
//! diagnostics surface as annotations in Actions logs.

use crate::models::{CheckReport, FailCount, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output == "human" && std::env::var_os("NO_COLOR").is_none()
}

/// Print the init section: workspace directory and discovered roots.
/// The JSON mode stays silent here; the same data lands in the final doc.
pub fn print_env(workspace: &Path, roots: &[std::path::PathBuf], output: &str) {
    if output == "json" {
        return;
    }
    if output == "github" {
        println!("::group::init log");
    }
    println!("dir: {}", workspace.display());
    println!("datapack roots:");
    for root in roots {
        println!("{}", root.display());
    }
    if output == "github" {
        println!("::endgroup::");
    }
}

/// Print the accumulated diagnostics in the requested format.
pub fn print_report(report: &CheckReport, workspace: &Path, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report, workspace)).unwrap()
        ),
        "github" => {
            for (category, entries) in &report.data {
                println!("::group::{category}");
                for entry in entries {
                    println!("{}", entry.title);
                    for out in &entry.messages {
                        let command = match out.severity {
                            Severity::Error => "error",
                            Severity::Warning => "warning",
                            _ => "notice",
                        };
                        println!("::{command}::{}: {}", entry.title, out.message);
                    }
                }
                println!("::endgroup::");
            }
        }
        _ => {
            let color = use_colors(output);
            for (category, entries) in &report.data {
                let heading = format!("[{category}]");
                if color {
                    println!("{}", heading.cyan().bold());
                } else {
                    println!("{heading}");
                }
                for entry in entries {
                    if color {
                        println!("  {}", entry.title.clone().bold());
                    } else {
                        println!("  {}", entry.title);
                    }
                    for out in &entry.messages {
                        let (icon, tag) = severity_markers(out.severity, color);
                        println!("    {icon} {tag} {}", out.message);
                    }
                }
            }
        }
    }
}

fn severity_markers(severity: Severity, color: bool) -> (String, String) {
    match severity {
        Severity::Error => {
            if color {
                ("✖".red().to_string(), "⟦error⟧".red().bold().to_string())
            } else {
                ("✖".to_string(), "⟦error⟧".to_string())
            }
        }
        Severity::Warning => {
            if color {
                ("▲".yellow().to_string(), "⟦warn⟧".yellow().bold().to_string())
            } else {
                ("▲".to_string(), "⟦warn⟧".to_string())
            }
        }
        Severity::Information => {
            if color {
                ("◆".blue().to_string(), "⟦info⟧".blue().bold().to_string())
            } else {
                ("◆".to_string(), "⟦info⟧".to_string())
            }
        }
        Severity::Hint => {
            if color {
                ("◇".blue().to_string(), "⟦hint⟧".blue().bold().to_string())
            } else {
                ("◇".to_string(), "⟦hint⟧".to_string())
            }
        }
    }
}

/// Print the final summary line. The JSON doc already carries the counts.
pub fn print_summary(fail: &FailCount, output: &str) {
    if output == "json" {
        return;
    }
    let line = summary_line(fail);
    if use_colors(output) {
        if fail.total() == 0 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line.red().bold());
        }
    } else {
        println!("{line}");
    }
}

/// The run's one-line verdict, pluralized per count.
pub fn summary_line(fail: &FailCount) -> String {
    if fail.total() == 0 {
        return "Check successful".to_string();
    }
    let error_s = if fail.error == 1 { "" } else { "s" };
    let warning_s = if fail.warning == 1 { "" } else { "s" };
    format!(
        "Check failed ({} error{}, {} warning{})",
        fail.error, error_s, fail.warning, warning_s
    )
}

/// Compose the JSON report document (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &CheckReport, workspace: &Path) -> JsonVal {
    json!({
        "workspace": workspace.to_string_lossy(),
        "roots": report.roots.iter().map(|r| r.to_string_lossy()).collect::<Vec<_>>(),
        "results": serde_json::to_value(&report.data).unwrap(),
        "summary": serde_json::to_value(report.fail).unwrap(),
    })
}
