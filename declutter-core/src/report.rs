//! Traversal results and their aggregation.
//!
//! A [`TraversalResult`] is filled by the walker, one [`Record`] per entry that
//! received a non-trivial action, in the order the actions were taken. It is
//! read-only afterwards; rendering lives in the CLI crate.

use std::path::{Path, PathBuf};

use crate::classifier::{Action, EntryKind};
use crate::errors::Failure;
use crate::rules::compiler::InvalidPattern;

/// Whether a run mutates the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Dry run: actions are computed and recorded as `Planned`.
    #[default]
    Preview,
    /// Actions are performed and recorded as `Applied` or `Failed`.
    Prune,
}

/// Terminal state of one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Planned,
    Applied,
    Failed(Failure),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// One action taken (or planned) on one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Path of the entry before the action.
    pub path: PathBuf,
    pub kind: EntryKind,
    pub action: Action,
    pub outcome: Outcome,
    /// For a deleted directory, the number of entries beneath it.
    pub descendants: usize,
}

impl Record {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Entry counts seen during the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub dirs: usize,
    pub files: usize,
}

/// Counts by action kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub deleted: usize,
    pub renamed: usize,
    pub empty_dirs: usize,
    pub conflicts: usize,
    pub failed: usize,
}

/// Everything a single run produced.
#[derive(Debug, Clone, Default)]
pub struct TraversalResult {
    pub mode: Mode,
    pub target: PathBuf,
    pub config_path: Option<PathBuf>,
    pub records: Vec<Record>,
    /// Entries left as they were, in visiting order.
    pub untouched: Vec<(PathBuf, EntryKind)>,
    pub invalid_patterns: Vec<InvalidPattern>,
    /// Temp areas excluded from processing.
    pub skipped: Vec<PathBuf>,
    pub stats: Stats,
}

impl TraversalResult {
    pub fn new(mode: Mode, target: PathBuf) -> Self {
        Self {
            mode,
            target,
            ..Self::default()
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Counts records by action kind. Failed actions count only as failures.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for record in &self.records {
            match &record.outcome {
                Outcome::Failed(f) => {
                    summary.failed += 1;
                    if f.is_conflict() {
                        summary.conflicts += 1;
                    }
                }
                Outcome::Planned | Outcome::Applied => match record.action {
                    Action::Delete(_) => summary.deleted += 1 + record.descendants,
                    Action::Rename(_) => summary.renamed += 1,
                    Action::DeleteIfEmpty => summary.empty_dirs += 1,
                    Action::NoOp => {}
                },
            }
        }
        summary
    }

    pub fn failures(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.outcome.is_failed())
    }

    /// The `(path, action)` pairs of this run, for comparing a preview with
    /// an execution.
    pub fn actions(&self) -> Vec<(PathBuf, Action)> {
        self.records
            .iter()
            .map(|r| (r.path.clone(), r.action.clone()))
            .collect()
    }

    /// False only when a prune run attempted actions and every one failed.
    pub fn exit_ok(&self) -> bool {
        if self.mode == Mode::Preview || self.records.is_empty() {
            return true;
        }
        self.records.iter().any(|r| r.outcome == Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DeleteReason;

    fn record(path: &str, action: Action, outcome: Outcome) -> Record {
        Record {
            path: PathBuf::from(path),
            kind: EntryKind::File,
            action,
            outcome,
            descendants: 0,
        }
    }

    #[test]
    fn summary_counts_by_kind() {
        let mut result = TraversalResult::new(Mode::Prune, PathBuf::from("t"));
        result.push(record("t/a.url", Action::Delete(DeleteReason::Pattern("*.url".into())), Outcome::Applied));
        result.push(record("t/b x.txt", Action::Rename("b.txt".into()), Outcome::Applied));
        result.push(record(
            "t/foo (1).txt",
            Action::Rename("foo.txt".into()),
            Outcome::Failed(Failure::Conflict { target: PathBuf::from("t/foo.txt") }),
        ));
        result.push(record("t/empty", Action::DeleteIfEmpty, Outcome::Applied));

        let s = result.summary();
        assert_eq!(s.deleted, 1);
        assert_eq!(s.renamed, 1);
        assert_eq!(s.empty_dirs, 1);
        assert_eq!(s.failed, 1);
        assert_eq!(s.conflicts, 1);
        assert_eq!(result.failures().count(), 1);
        assert!(result.exit_ok());
    }

    #[test]
    fn deleted_directories_count_their_descendants() {
        let mut result = TraversalResult::new(Mode::Preview, PathBuf::from("t"));
        let mut r = record("t/junk", Action::Delete(DeleteReason::Pattern("junk".into())), Outcome::Planned);
        r.kind = EntryKind::Dir;
        r.descendants = 3;
        result.push(r);
        assert_eq!(result.summary().deleted, 4);
    }

    #[test]
    fn all_failed_prune_run_is_not_ok() {
        let mut result = TraversalResult::new(Mode::Prune, PathBuf::from("t"));
        assert!(result.exit_ok());
        result.push(record(
            "t/a",
            Action::Delete(DeleteReason::Pattern("a".into())),
            Outcome::Failed(Failure::PermissionDenied),
        ));
        assert!(!result.exit_ok());
    }

    #[test]
    fn preview_is_always_ok() {
        let mut result = TraversalResult::new(Mode::Preview, PathBuf::from("t"));
        result.push(record("t/a", Action::Rename("b".into()), Outcome::Failed(Failure::Vanished)));
        assert!(result.exit_ok());
    }
}
