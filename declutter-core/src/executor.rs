//! Defines the `ActionExecutor` trait.
//!
//! The walker decides what to do with every entry; an executor carries the
//! decision out. Two implementations exist: [`crate::PreviewExecutor`], which
//! never touches the filesystem and reports every action as planned, and
//! [`crate::PruneExecutor`], which performs it. Keeping both behind one
//! interface means a dry run walks exactly the same code path as a real one.
//!
//! License: MIT OR APACHE 2.0

use std::path::Path;

use crate::classifier::EntryKind;
use crate::report::{Mode, Outcome};

/// Carries out the actions decided by the walker.
pub trait ActionExecutor: Send + Sync {
    /// Whether this executor mutates the filesystem.
    fn mode(&self) -> Mode;

    /// Deletes an entry. Directories are removed with their whole subtree;
    /// symlinks are removed themselves, never their target.
    fn delete(&self, path: &Path, kind: EntryKind) -> Outcome;

    /// Renames `from` to `to` within the same directory. Must not overwrite an
    /// existing `to`.
    fn rename(&self, from: &Path, to: &Path) -> Outcome;

    /// Removes a directory expected to be empty.
    fn remove_empty_dir(&self, path: &Path) -> Outcome;
}
