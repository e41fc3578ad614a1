//! pysave core library.
//!
//! Save hooks for Python documents in a TextMate-style editor: formatters run
//! before save, linters after save, and findings come back as gutter markers
//! plus a summary tooltip.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Environment/config-file settings resolution.
//! - `tools`: black/isort/flake8/pylint descriptors and binary lookup.
//! - `runner`: Blocking subprocess execution behind a trait.
//! - `aggregate`: Delimited linter output → `DiagnosticIndex`.
//! - `markers`: Marker sink and the `$TM_MATE` implementation.
//! - `pipeline`: The will-save and did-save pipelines.
//! - `output`: Summary/tooltip/marker text.
//! - `models`: Diagnostic and report types.
//! - `error`: Error taxonomy and tooltip text.
//! - `utils`: Supporting helpers.
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod markers;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod runner;
pub mod tools;
pub mod utils;
