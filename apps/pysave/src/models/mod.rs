//! Shared data models for parsed linter findings and run reports.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single linter finding on one source line.
pub struct Diagnostic {
    pub line: i64,
    /// Column token as the tool printed it (flake8 is 1-based, pylint 0-based).
    pub column: String,
    pub code: String,
    pub message: String,
}

/// Line number -> findings on that line, in first-seen line order.
///
/// Findings from different tools on the same line are kept side by side,
/// duplicates included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiagnosticIndex {
    lines: IndexMap<i64, Vec<Diagnostic>>,
}

impl DiagnosticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding after any existing findings for its line.
    pub fn push(&mut self, diag: Diagnostic) {
        self.lines.entry(diag.line).or_default().push(diag);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines with at least one finding.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, line: i64) -> Option<&[Diagnostic]> {
        self.lines.get(&line).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &[Diagnostic])> {
        self.lines.iter().map(|(l, d)| (*l, d.as_slice()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Clean,
    HasErrors,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Result of a did-save run: collected findings plus the linters that
/// reported nothing.
pub struct Report {
    pub index: DiagnosticIndex,
    pub clean_tools: Vec<String>,
}

impl Report {
    pub fn outcome(&self) -> RunOutcome {
        if self.index.is_empty() {
            RunOutcome::Clean
        } else {
            RunOutcome::HasErrors
        }
    }
}
