// declutter/src/main.rs
//! declutter entry point.
//!
//! Parses the command line, sets up logging and the theme, then runs a single
//! preview or prune pass over the target directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use declutter::cli::Cli;
use declutter::commands::declutter::{error_msg, run_declutter, DeclutterOptions};
use declutter::logger;
use declutter::ui::theme::{build_theme_map, ThemeStyle};

fn run(cli: &Cli) -> Result<bool> {
    let theme = build_theme_map(cli.theme.as_ref()).context("Theme error")?;
    let opts = DeclutterOptions {
        target: cli.target.clone(),
        config: cli.config.clone(),
        walk: cli.walk_options(),
        mode: cli.mode(),
        verbose: cli.verbose,
        allow_colors: !cli.no_color,
    };
    run_declutter(&opts, &theme)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level());

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error_msg(format!("{:#}", e), &ThemeStyle::default_theme_map(), !cli.no_color);
            ExitCode::from(2)
        }
    }
}
