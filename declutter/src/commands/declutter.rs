//! The declutter command: resolve patterns, walk the target, print the report.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;

use declutter_core::{clean_tree, Mode, TraversalResult, WalkOptions};

use crate::ui::output_format;
use crate::ui::report::{print_report, ReportOptions};
use crate::ui::theme::ThemeMap;

/// Everything one invocation needs.
#[derive(Debug, Clone)]
pub struct DeclutterOptions {
    pub target: PathBuf,
    pub config: Option<PathBuf>,
    pub walk: WalkOptions,
    pub mode: Mode,
    pub verbose: u8,
    /// False when the user asked for plain output.
    pub allow_colors: bool,
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap, allow_colors: bool) {
    let enable = allow_colors && io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, enable);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap, allow_colors: bool) {
    let enable = allow_colors && io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, enable);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap, allow_colors: bool) {
    let enable = allow_colors && io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, enable);
}

/// Runs one pass and prints its report to stdout.
///
/// Returns whether the run counts as successful; fatal conditions come back
/// as errors.
pub fn run_declutter(opts: &DeclutterOptions, theme: &ThemeMap) -> Result<bool> {
    info!("Starting declutter on {}", opts.target.display());
    debug!("Walk options: {:?}", opts.walk);

    let result = clean_tree(&opts.target, opts.config.as_deref(), &opts.walk, opts.mode)
        .with_context(|| format!("Cannot clean {}", opts.target.display()))?;

    report_notes(&result, opts, theme);

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let report_opts = ReportOptions {
        verbose: opts.verbose,
        enable_colors: opts.allow_colors && stdout.is_terminal(),
    };
    print_report(&result, &mut writer, theme, report_opts).context("Failed to write report")?;
    writer.flush().context("Failed to write report")?;

    if result.mode == Mode::Preview && !result.records.is_empty() {
        info_msg(
            "Preview only, nothing was changed. Re-run with --prune to apply.",
            theme,
            opts.allow_colors,
        );
    }

    info!("declutter finished.");
    Ok(result.exit_ok())
}

/// Prints the side notes of a run (config used, skipped temp areas) to stderr.
fn report_notes(result: &TraversalResult, opts: &DeclutterOptions, theme: &ThemeMap) {
    match &result.config_path {
        Some(path) if opts.verbose >= 1 => {
            info_msg(format!("Using patterns from {}", path.display()), theme, opts.allow_colors)
        }
        None => info_msg(
            "No cleanup patterns file found; nothing to match.",
            theme,
            opts.allow_colors,
        ),
        _ => {}
    }

    for path in &result.skipped {
        if path == &result.target {
            warn_msg(
                format!("{} is inside a temp area; nothing was processed.", path.display()),
                theme,
                opts.allow_colors,
            );
        } else if opts.verbose >= 1 {
            info_msg(format!("Skipped temp area {}", path.display()), theme, opts.allow_colors);
        }
    }
}
