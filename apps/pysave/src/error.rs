//! Error taxonomy for the save hooks.
//!
//! Every failure is terminal for the current save event. Stages return
//! `Result<_, Error>` and only the binary entry point turns an error into a
//! tooltip and an exit status.

use crate::output::boxify;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required setting (usually an editor environment variable) is absent.
    #[error("err: {0}")]
    MissingSetting(String),

    /// Neither an override nor the shell lookup produced a binary path.
    #[error("{0} binary not found!")]
    ToolNotFound(String),

    /// The tool ran but reported a failure (stderr output or bad exit status).
    #[error("{tool} failed (exit {exit_code})")]
    ToolFailed {
        tool: String,
        stderr: String,
        exit_code: i32,
    },

    /// A process could not be started at all.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file exists but cannot be parsed.
    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },
}

impl Error {
    /// Text shown to the user in the editor tooltip.
    ///
    /// Setup errors are shown bare, missing binaries are boxed, and tool
    /// failures relay the tool's own stderr untouched. A tool that failed
    /// without writing to stderr gets a boxed note with its exit status.
    pub fn tooltip(&self) -> String {
        match self {
            Error::MissingSetting(_) => self.to_string(),
            Error::ToolNotFound(_) => boxify(&self.to_string()),
            Error::ToolFailed { stderr, .. } if !stderr.trim().is_empty() => stderr.clone(),
            _ => boxify(&self.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
