//! Tooltip and marker text rendering.
//!
//! Everything here is pure string building; the editor-visible side effects
//! live in `markers` and in the binary's exit path.

use crate::models::{DiagnosticIndex, Report, RunOutcome};

const RULE_WIDTH: usize = 64;

/// Frame `text` between two horizontal rules for tooltip display.
pub fn boxify(text: &str) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!("{rule}\n {text}\n{rule}")
}

/// Render the end-of-run summary.
///
/// A clean run lists the linters that reported nothing. Otherwise the
/// findings are grouped under a `[line N]` header per line, in index order.
pub fn render_summary(report: &Report) -> String {
    let mut out = Vec::new();
    match report.outcome() {
        RunOutcome::Clean => {
            out.push("Following checks completed:\n".to_string());
            for tool in &report.clean_tools {
                out.push(format!("\t {} 👍", tool));
            }
            out.push("\nGood to go! ✨ 🍰 ✨".to_string());
        }
        RunOutcome::HasErrors => {
            out.push(format!("Found {} error(s)\n", report.index.line_count()));
            for (line, diags) in report.index.iter() {
                out.push(format!("[line {}]", line));
                for d in diags {
                    out.push(format!("\t- {} : {}", d.code, d.message));
                }
            }
        }
    }
    out.join("\n")
}

/// Build the per-line marker annotations: one `[code]: message` entry per
/// finding, newline separated.
pub fn render_markers(index: &DiagnosticIndex) -> Vec<(i64, String)> {
    index
        .iter()
        .map(|(line, diags)| {
            let text = diags
                .iter()
                .map(|d| format!("[{}]: {}", d.code, d.message))
                .collect::<Vec<_>>()
                .join("\n");
            (line, text)
        })
        .collect()
}
