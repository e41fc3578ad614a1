//! The two save pipelines.
//!
//! - will-save: black, then isort, each rewriting the document in full.
//! - did-save: clear markers, pylint, flake8, set markers, report.
//!
//! Both stop at the first error; nothing is retried and a failed
//! formatter's output is never applied.

use crate::aggregate::{parse_tool_output, DELIMITER};
use crate::config::{require, Effective, ENV_DOCUMENT_UUID, ENV_FILEPATH, ENV_MATE};
use crate::error::Result;
use crate::markers::{emit_markers, MarkerSink, MateSink};
use crate::models::Report;
use crate::runner::ProcessRunner;
use crate::tools::{run_tool, Tool};

const FORMATTERS: [Tool; 2] = [Tool::Black, Tool::Isort];
const LINTERS: [Tool; 2] = [Tool::Pylint, Tool::Flake8];

/// Run the formatters over `document` and return the final content.
pub fn will_save(
    eff: &Effective,
    runner: &mut dyn ProcessRunner,
    document: String,
) -> Result<String> {
    let path = eff.setup()?;
    let mut document = document;
    for tool in FORMATTERS {
        document = run_tool(tool, eff, runner, &path, Some(document.as_str()))?;
    }
    Ok(document)
}

/// Lint the saved file, refresh the editor's markers, and return the
/// collected report.
///
/// The report is built from empty on every call.
pub fn did_save(
    eff: &Effective,
    runner: &mut dyn ProcessRunner,
    sink: &mut dyn MarkerSink,
) -> Result<Report> {
    let path = eff.setup()?;
    require(&eff.filepath, ENV_FILEPATH)?;
    sink.clear()?;

    let mut report = Report::default();
    for tool in LINTERS {
        let out = run_tool(tool, eff, runner, &path, None)?;
        if out.is_empty() {
            report.clean_tools.push(tool.name().to_string());
        } else {
            parse_tool_output(&mut report.index, &out, DELIMITER);
        }
    }
    log::info!(
        "{} line(s) with findings, clean: {:?}",
        report.index.line_count(),
        report.clean_tools
    );

    emit_markers(&report.index, sink)?;
    Ok(report)
}

/// Build the marker sink for the editor document.
///
/// Only the sink's own settings are checked here; `did_save` checks the
/// interpreter and saved file before the sink is first used.
pub fn mate_sink<R: ProcessRunner>(eff: &Effective, runner: R) -> Result<MateSink<R>> {
    let mate = require(&eff.mate, ENV_MATE)?;
    let uuid = require(&eff.document_uuid, ENV_DOCUMENT_UUID)?;
    Ok(MateSink::new(mate, uuid, runner))
}
