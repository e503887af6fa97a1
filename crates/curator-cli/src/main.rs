//! Curator CLI - Command-line interface for managing annotated datasets.

use anyhow::Context;
use clap::Parser;
use curator_cli::commands;
use curator_cli::{AppState, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout only carries command output.
///
/// `CURATOR_LOG` takes precedence; otherwise `-v` selects info and `-vv`
/// debug, with warn as the default.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("CURATOR_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let state = AppState::new(config, Formatter::new(format, color_enabled));

    match cli.command {
        Command::Project(args) => commands::execute_project(args, &state)?,
        Command::Stats(args) => commands::execute_stats(args, &state)?,
        Command::Show(args) => commands::execute_show(args, &state)?,
        Command::Filter(args) => commands::execute_filter(args, &state)?,
        Command::Modify(args) => commands::execute_modify(args, &state)?,
        Command::Import(args) => commands::execute_import(args, &state)?,
        Command::Extract(args) => commands::execute_extract(args, &state)?,
        Command::Generate(args) => commands::execute_generate(args, &state)?,
        Command::Prompt(args) => commands::execute_prompt(args, &state)?,
    }

    Ok(())
}
