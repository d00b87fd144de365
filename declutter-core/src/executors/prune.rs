//! An `ActionExecutor` that applies actions to the filesystem.
//!
//! Every failure is turned into an [`Outcome::Failed`]; nothing here returns
//! early to the walker.

use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::classifier::EntryKind;
use crate::errors::Failure;
use crate::executor::ActionExecutor;
use crate::report::{Mode, Outcome};

#[derive(Debug, Default, Clone, Copy)]
pub struct PruneExecutor;

fn outcome(path: &Path, what: &str, result: io::Result<()>) -> Outcome {
    match result {
        Ok(()) => {
            info!("{} {}", what, path.display());
            Outcome::Applied
        }
        Err(e) => {
            warn!("Failed to {} {}: {}", what.to_lowercase(), path.display(), e);
            Outcome::Failed(Failure::from_io(&e))
        }
    }
}

fn remove_symlink(path: &Path) -> io::Result<()> {
    // Directory symlinks on Windows must be removed as directories.
    match fs::remove_file(path) {
        Err(e) if cfg!(windows) => fs::remove_dir(path).map_err(|_| e),
        other => other,
    }
}

impl ActionExecutor for PruneExecutor {
    fn mode(&self) -> Mode {
        Mode::Prune
    }

    fn delete(&self, path: &Path, kind: EntryKind) -> Outcome {
        let result = match kind {
            EntryKind::Dir => fs::remove_dir_all(path),
            EntryKind::Symlink => remove_symlink(path),
            EntryKind::File | EntryKind::Other => fs::remove_file(path),
        };
        outcome(path, "Deleted", result)
    }

    fn rename(&self, from: &Path, to: &Path) -> Outcome {
        if fs::symlink_metadata(to).is_ok() {
            warn!(
                "Not renaming {}: {} already exists",
                from.display(),
                to.display()
            );
            return Outcome::Failed(Failure::Conflict {
                target: to.to_path_buf(),
            });
        }
        outcome(from, "Renamed", fs::rename(from, to))
    }

    fn remove_empty_dir(&self, path: &Path) -> Outcome {
        outcome(path, "Removed empty directory", fs::remove_dir(path))
    }
}
