//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pysave",
    version,
    about = "Python save hooks for the editor",
    long_about = "pysave — format Python documents with black and isort before save, and mark pylint/flake8 findings after save.\n\nSettings precedence: CLI > TM_* environment > pysave.toml > shell lookup.",
    after_help = "Examples:\n  pysave will-save < app.py\n  TM_FILEPATH=app.py pysave did-save",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands, one per editor callback.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current pysave version."
    )]
    Version,
    /// Format the document on stdin
    #[command(
        about = "Format before save",
        long_about = "Read the document from stdin, run black then isort, and print the result. Any failure is shown as a tooltip and the document is left untouched.",
        after_help = "Examples:\n  pysave will-save < app.py"
    )]
    WillSave {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Lint the saved file and set markers
    #[command(
        about = "Lint after save",
        long_about = "Run pylint then flake8 on the saved file, replace the document's gutter markers, and show a summary tooltip.",
        after_help = "Examples:\n  pysave did-save\n  pysave did-save --file src/app.py"
    )]
    DidSave {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Default)]
pub struct CommonArgs {
    #[arg(
        long,
        help = "Project root for pysave.toml discovery (default: saved file's directory)"
    )]
    pub repo_root: Option<String>,
    #[arg(long, help = "Saved file path (default: $TM_FILEPATH)")]
    pub file: Option<String>,
}
