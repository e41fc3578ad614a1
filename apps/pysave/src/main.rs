//! pysave CLI binary entry point.
//! Resolves settings, runs one save pipeline, and owns the only exit.

use clap::Parser;
use pysave::cli::{Cli, Commands, CommonArgs};
use pysave::config::{self, CliOverrides, Effective};
use pysave::error::Result;
use pysave::output::{boxify, render_summary};
use pysave::pipeline;
use pysave::runner::SystemRunner;
use std::io::{Read, Write};

/// Exit status the editor interprets as "show output as tooltip".
const EXIT_SHOW_TOOL_TIP: i32 = 206;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("PYSAVE_LOG", "warn"))
        .init();
    let cli = Cli::parse();
    let code = match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            0
        }
        Commands::WillSave { common } => match will_save(&common) {
            Ok(document) => {
                print!("{}", document);
                0
            }
            Err(e) => fail(e),
        },
        Commands::DidSave { common } => match did_save(&common) {
            Ok(summary) => show_tool_tip(&summary),
            Err(e) => fail(e),
        },
    };
    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

fn effective(common: &CommonArgs) -> Result<Effective> {
    let cli = CliOverrides {
        repo_root: common.repo_root.clone(),
        file: common.file.clone(),
    };
    let eff = config::resolve_effective(&cli, |k| std::env::var(k).ok())?;
    if let Some(p) = eff.config_path.as_ref() {
        log::info!("using config {}", p.to_string_lossy());
    }
    Ok(eff)
}

fn will_save(common: &CommonArgs) -> Result<String> {
    let eff = effective(common)?;
    let mut document = String::new();
    std::io::stdin().read_to_string(&mut document)?;
    pipeline::will_save(&eff, &mut SystemRunner, document)
}

fn did_save(common: &CommonArgs) -> Result<String> {
    let eff = effective(common)?;
    let mut sink = pipeline::mate_sink(&eff, SystemRunner)?;
    let report = pipeline::did_save(&eff, &mut SystemRunner, &mut sink)?;
    Ok(boxify(&render_summary(&report)))
}

fn fail(e: pysave::error::Error) -> i32 {
    eprintln!("{} {}", pysave::utils::error_prefix(), e);
    show_tool_tip(&e.tooltip())
}

fn show_tool_tip(text: &str) -> i32 {
    print!("{}", text);
    EXIT_SHOW_TOOL_TIP
}
