//! Editor gutter markers.
//!
//! Markers are set and cleared through the editor's companion executable
//! (`$TM_MATE`). The sink is a trait so the did-save pipeline can be run
//! against a recorder in tests.

use crate::error::Result;
use crate::models::DiagnosticIndex;
use crate::output::render_markers;
use crate::runner::{Invocation, ProcessRunner};

const MARK_KINDS: [&str; 3] = ["note", "warning", "error"];

pub trait MarkerSink {
    /// Remove every marker kind this tool may have set previously.
    fn clear(&mut self) -> Result<()>;
    /// Attach an error marker with `text` to `line`.
    fn set_error(&mut self, line: i64, text: &str) -> Result<()>;
}

/// Drives `$TM_MATE --uuid <document>` through a process runner.
pub struct MateSink<R> {
    mate: String,
    uuid: String,
    runner: R,
}

impl<R: ProcessRunner> MateSink<R> {
    pub fn new(mate: &str, uuid: &str, runner: R) -> Self {
        Self {
            mate: mate.to_string(),
            uuid: uuid.to_string(),
            runner,
        }
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    fn invoke(&mut self, args: Vec<String>) -> Result<()> {
        let inv = Invocation::new(&self.mate)
            .args(["--uuid".to_string(), self.uuid.clone()])
            .args(args);
        let out = self.runner.run(&inv)?;
        // The editor shows nothing useful for a rejected mark; keep going.
        if !out.success() {
            log::warn!(
                "{} exited with {}: {}",
                self.mate,
                out.exit_code,
                out.stderr.trim()
            );
        }
        Ok(())
    }
}

impl<R: ProcessRunner> MarkerSink for MateSink<R> {
    fn clear(&mut self) -> Result<()> {
        let args = MARK_KINDS
            .iter()
            .map(|k| format!("--clear-mark={}", k))
            .collect();
        self.invoke(args)
    }

    fn set_error(&mut self, line: i64, text: &str) -> Result<()> {
        self.invoke(vec![
            "--line".to_string(),
            line.to_string(),
            "--set-mark".to_string(),
            format!("error:{}", text),
        ])
    }
}

/// Set one error marker per line in `index`, in index order.
pub fn emit_markers(index: &DiagnosticIndex, sink: &mut dyn MarkerSink) -> Result<()> {
    for (line, text) in render_markers(index) {
        sink.set_error(line, &text)?;
    }
    Ok(())
}
