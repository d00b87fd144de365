//! An `ActionExecutor` that performs no filesystem mutation.

use std::path::Path;

use log::debug;

use crate::classifier::EntryKind;
use crate::executor::ActionExecutor;
use crate::report::{Mode, Outcome};

#[derive(Debug, Default, Clone, Copy)]
pub struct PreviewExecutor;

impl ActionExecutor for PreviewExecutor {
    fn mode(&self) -> Mode {
        Mode::Preview
    }

    fn delete(&self, path: &Path, _kind: EntryKind) -> Outcome {
        debug!("[preview] would delete {}", path.display());
        Outcome::Planned
    }

    fn rename(&self, from: &Path, to: &Path) -> Outcome {
        debug!("[preview] would rename {} -> {}", from.display(), to.display());
        Outcome::Planned
    }

    fn remove_empty_dir(&self, path: &Path) -> Outcome {
        debug!("[preview] would remove empty directory {}", path.display());
        Outcome::Planned
    }
}
