// File: declutter-core/src/headless.rs

//! Convenience wrapper for a complete, non-interactive run.
//!
//! [`clean_tree`] chains the pieces a caller would otherwise wire up by hand:
//! target check, config resolution, rule compilation, executor selection and
//! the walk itself.

use log::info;
use std::path::Path;

use crate::digest::Sha256Digester;
use crate::errors::DeclutterError;
use crate::executor::ActionExecutor;
use crate::executors::preview::PreviewExecutor;
use crate::executors::prune::PruneExecutor;
use crate::report::{Mode, TraversalResult};
use crate::resolver::resolve;
use crate::rules::compiler::RuleSet;
use crate::walker::{self, check_target, WalkOptions};

/// Resolves the patterns for `target` (or loads `explicit_config`), then walks
/// the tree in the requested mode.
///
/// # Errors
/// Only fatal conditions are returned: a missing or non-directory target, or
/// an explicit config that is missing or cannot be parsed. Everything that
/// goes wrong for individual entries ends up in the returned report.
pub fn clean_tree(
    target: &Path,
    explicit_config: Option<&Path>,
    options: &WalkOptions,
    mode: Mode,
) -> Result<TraversalResult, DeclutterError> {
    check_target(target)?;

    let resolved = resolve(target, explicit_config)?;
    if resolved.config.is_empty() {
        info!("No patterns configured; this run will not change anything.");
    }
    let rules = RuleSet::compile(&resolved.config, &options.families);

    let executor: Box<dyn ActionExecutor> = match mode {
        Mode::Preview => Box::new(PreviewExecutor),
        Mode::Prune => Box::new(PruneExecutor),
    };

    let mut result = walker::run(target, &rules, options, executor.as_ref(), &Sha256Digester)?;
    result.config_path = resolved.source.path().map(Path::to_path_buf);
    Ok(result)
}
