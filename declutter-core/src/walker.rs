//! Depth-first, post-order tree walker.
//!
//! For every directory the walker lists its children (directories first, then
//! by name), fully processes each child subtree, and only then applies the
//! child's own action. A directory is therefore renamed or removed after
//! everything beneath it is settled, and the paths of its children are still
//! the original ones while they are being visited.
//!
//! The walker keeps a simulated listing of each directory it processes. A
//! successful (or planned) delete drops a name; a rename moves one. Rename
//! conflicts and emptiness are judged against that listing, so a preview run
//! reaches the same decisions an execution run would on an unchanged tree.
//!
//! Symlinks are classified by name and never followed. Per-entry failures are
//! recorded and the walk continues with the next sibling.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::classifier::{classify, is_temp_name, Action, Entry, EntryKind};
use crate::config::{config_file_in, is_config_filename, PatternConfig};
use crate::digest::Digester;
use crate::errors::{DeclutterError, Failure};
use crate::executor::ActionExecutor;
use crate::report::{Outcome, Record, TraversalResult};
use crate::rules::compiler::{Families, RuleSet};

/// Name of the temp/staging directory convention protected by default.
pub const DEFAULT_TEMP_NAME: &str = ".tmp";

/// Switches controlling a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Pattern families in use. Applied when compiling rule sets, including
    /// nested ones.
    pub families: Families,
    /// Remove directories left without children.
    pub empty_dirs: bool,
    /// Skip temp/staging directories (and the whole run when the target sits
    /// inside one).
    pub skip_tmp: bool,
    pub temp_names: Vec<String>,
    /// Let a config file found inside the tree govern that subtree.
    pub nested_configs: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            families: Families::default(),
            empty_dirs: true,
            skip_tmp: false,
            temp_names: vec![DEFAULT_TEMP_NAME.to_string()],
            nested_configs: true,
        }
    }
}

struct Child {
    path: PathBuf,
    name: String,
    utf8: bool,
    kind: EntryKind,
}

/// Walks one target tree with one executor.
pub struct Walker<'a> {
    executor: &'a dyn ActionExecutor,
    digester: &'a dyn Digester,
    options: &'a WalkOptions,
    result: TraversalResult,
}

/// Checks that `target` exists and is a directory.
pub fn check_target(target: &Path) -> Result<(), DeclutterError> {
    match fs::metadata(target) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DeclutterError::TargetNotDirectory(target.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DeclutterError::TargetPathNotFound(target.to_path_buf()))
        }
        Err(source) => Err(DeclutterError::Io {
            path: target.to_path_buf(),
            source,
        }),
    }
}

/// Whether `path` or any of its ancestors carries a protected temp name.
pub fn inside_temp_area(path: &Path, temp_names: &[String]) -> bool {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute.components().any(|c| match c {
        Component::Normal(name) => is_temp_name(&name.to_string_lossy(), temp_names),
        _ => false,
    })
}

/// Final action for a directory whose subtree has been walked. `remaining` is
/// `None` when the directory could not be listed; its listing failure is then
/// its only record and its own action is dropped.
fn settle_dir_action(action: Action, remaining: Option<usize>, empty_dirs: bool) -> Option<Action> {
    match remaining {
        None => None,
        Some(0) if empty_dirs => Some(Action::DeleteIfEmpty),
        Some(_) => Some(action),
    }
}

/// Counts directories and non-directories beneath `path` without following
/// symlinks. Unreadable parts are skipped.
fn count_subtree(path: &Path) -> (usize, usize) {
    let Ok(entries) = fs::read_dir(path) else {
        return (0, 0);
    };
    let mut dirs = 0;
    let mut files = 0;
    for entry in entries.flatten() {
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => {
                dirs += 1;
                let (d, f) = count_subtree(&entry.path());
                dirs += d;
                files += f;
            }
            _ => files += 1,
        }
    }
    (dirs, files)
}

/// Runs one full pass over `target`.
pub fn run(
    target: &Path,
    rules: &RuleSet,
    options: &WalkOptions,
    executor: &dyn ActionExecutor,
    digester: &dyn Digester,
) -> Result<TraversalResult, DeclutterError> {
    Walker::new(executor, digester, options).run(target, rules)
}

impl<'a> Walker<'a> {
    pub fn new(
        executor: &'a dyn ActionExecutor,
        digester: &'a dyn Digester,
        options: &'a WalkOptions,
    ) -> Self {
        Self {
            executor,
            digester,
            options,
            result: TraversalResult::default(),
        }
    }

    pub fn run(mut self, target: &Path, rules: &RuleSet) -> Result<TraversalResult, DeclutterError> {
        check_target(target)?;
        self.result = TraversalResult::new(self.executor.mode(), target.to_path_buf());
        self.result
            .invalid_patterns
            .extend(rules.invalid_patterns().iter().cloned());

        if self.options.skip_tmp && inside_temp_area(target, &self.options.temp_names) {
            info!(
                "{} is inside a temp area; skipping the whole run.",
                target.display()
            );
            self.result.skipped.push(target.to_path_buf());
            return Ok(self.result);
        }

        info!("Walking {} ({:?} mode)", target.display(), self.executor.mode());
        self.walk_dir(target, rules);
        Ok(self.result)
    }

    /// Loads a config file sitting directly in `dir`, if any.
    fn nested_rules(&mut self, dir: &Path) -> Option<RuleSet> {
        let path = config_file_in(dir)?;
        match PatternConfig::load_from_file(&path) {
            Ok(config) => {
                info!("Using nested cleanup patterns from {}", path.display());
                let rules = RuleSet::compile(&config, &self.options.families);
                self.result
                    .invalid_patterns
                    .extend(rules.invalid_patterns().iter().cloned());
                Some(rules)
            }
            Err(e) => {
                warn!("Ignoring nested config, keeping inherited rules: {}", e);
                None
            }
        }
    }

    fn list_children(&mut self, dir: &Path) -> Option<Vec<Child>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read directory {}: {}", dir.display(), e);
                self.fail_listing(dir, &e);
                return None;
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Cannot read an entry of {}: {}", dir.display(), e);
                    continue;
                }
            };
            let kind = match entry.file_type() {
                Ok(ft) => EntryKind::from_file_type(&ft),
                Err(e) => {
                    warn!("Cannot stat {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            let os_name = entry.file_name();
            let utf8 = os_name.to_str().is_some();
            children.push(Child {
                path: entry.path(),
                name: os_name.to_string_lossy().into_owned(),
                utf8,
                kind,
            });
        }

        children.sort_by(|a, b| {
            let a_dir = a.kind != EntryKind::Dir;
            let b_dir = b.kind != EntryKind::Dir;
            a_dir.cmp(&b_dir).then_with(|| a.name.cmp(&b.name))
        });
        Some(children)
    }

    fn fail_listing(&mut self, dir: &Path, err: &std::io::Error) {
        self.fail_entry(dir.to_path_buf(), EntryKind::Dir, Failure::from_io(err));
    }

    fn fail_entry(&mut self, path: PathBuf, kind: EntryKind, failure: Failure) {
        self.result.push(Record {
            path,
            kind,
            action: Action::NoOp,
            outcome: Outcome::Failed(failure),
            descendants: 0,
        });
    }

    /// Processes every child of `dir` and returns how many children remain,
    /// or `None` when `dir` could not be listed.
    fn walk_dir(&mut self, dir: &Path, inherited: &RuleSet) -> Option<usize> {
        let nested = if self.options.nested_configs && dir != self.result.target {
            self.nested_rules(dir)
        } else {
            None
        };
        let rules: Cow<'_, RuleSet> = match nested {
            Some(r) => Cow::Owned(r),
            None => Cow::Borrowed(inherited),
        };

        let children = self.list_children(dir)?;
        let mut listing: HashSet<String> = children.iter().map(|c| c.name.clone()).collect();

        for child in children {
            if child.kind == EntryKind::Dir {
                self.result.stats.dirs += 1;
            } else {
                self.result.stats.files += 1;
            }

            if child.kind == EntryKind::File && is_config_filename(&child.name) {
                debug!("Leaving config file {} alone", child.path.display());
                self.result.untouched.push((child.path, child.kind));
                continue;
            }

            if child.kind == EntryKind::Dir
                && self.options.skip_tmp
                && is_temp_name(&child.name, &self.options.temp_names)
            {
                info!("Skipping temp area {}", child.path.display());
                self.result.skipped.push(child.path);
                continue;
            }

            let digester = self.digester;
            let mut digest_failure = None;
            let mut action = classify(
                Entry {
                    name: &child.name,
                    kind: child.kind,
                },
                &rules,
                || match digester.digest(&child.path) {
                    Ok(d) => Some(d),
                    Err(e) => {
                        warn!("Cannot hash {}: {}", child.path.display(), e);
                        digest_failure = Some(Failure::from_io(&e));
                        None
                    }
                },
            );
            if !child.utf8 && matches!(action, Action::Rename(_)) {
                debug!("Not renaming non-UTF-8 name {}", child.path.display());
                action = Action::NoOp;
            }

            if let Some(failure) = digest_failure {
                // Cleanup still applies; only the hash check is undecided.
                self.fail_entry(child.path.clone(), child.kind, failure);
                if action == Action::NoOp {
                    continue;
                }
            }

            if child.kind == EntryKind::Dir && !matches!(action, Action::Delete(_)) {
                let remaining = self.walk_dir(&child.path, &rules);
                match settle_dir_action(action, remaining, self.options.empty_dirs) {
                    Some(settled) => action = settled,
                    None => continue,
                }
            }

            self.apply(dir, child, action, &mut listing);
        }

        Some(listing.len())
    }

    fn apply(&mut self, dir: &Path, child: Child, action: Action, listing: &mut HashSet<String>) {
        let mut descendants = 0;
        let outcome = match &action {
            Action::NoOp => {
                self.result.untouched.push((child.path, child.kind));
                return;
            }
            Action::Delete(reason) => {
                if child.kind == EntryKind::Dir {
                    let (d, f) = count_subtree(&child.path);
                    self.result.stats.dirs += d;
                    self.result.stats.files += f;
                    descendants = d + f;
                }
                debug!("{} matched {}", child.path.display(), reason);
                self.executor.delete(&child.path, child.kind)
            }
            Action::DeleteIfEmpty => self.executor.remove_empty_dir(&child.path),
            Action::Rename(new_name) => {
                let target = dir.join(new_name);
                if listing.contains(new_name) {
                    warn!(
                        "Not renaming {}: {} already exists",
                        child.path.display(),
                        target.display()
                    );
                    Outcome::Failed(Failure::Conflict { target })
                } else {
                    self.executor.rename(&child.path, &target)
                }
            }
        };

        if !outcome.is_failed() {
            listing.remove(&child.name);
            if let Action::Rename(new_name) = &action {
                listing.insert(new_name.clone());
            }
        }

        self.result.push(Record {
            path: child.path,
            kind: child.kind,
            action,
            outcome,
            descendants,
        });
    }
}
