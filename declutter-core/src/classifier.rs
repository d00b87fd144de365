//! Entry classification.
//!
//! [`classify`] decides what should happen to a single filesystem entry from
//! its name, its kind and the compiled [`RuleSet`]. It performs no I/O: the
//! content digest needed for hash matching is supplied lazily by the caller,
//! and is only requested for regular files when digests are configured.
//!
//! Decision order:
//! 1. a whole-name `remove` match deletes the entry;
//! 2. a regular file whose digest is listed in `remove_hash` is deleted;
//! 3. a cleanup pass that yields a different, usable name renames it;
//! 4. otherwise nothing happens.
//!
//! `DeleteIfEmpty` is never produced here; the walker decides it after all
//! children of a directory are settled.

use std::fmt;

use crate::rules::compiler::RuleSet;

/// Kind of a filesystem entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Other,
}

impl EntryKind {
    pub fn from_file_type(ft: &std::fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// What a classifier sees of an entry.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub kind: EntryKind,
}

/// Why an entry is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteReason {
    /// Matched this `remove` specifier.
    Pattern(String),
    /// Content digest listed in `remove_hash`.
    Hash(String),
}

impl fmt::Display for DeleteReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeleteReason::Pattern(p) => write!(f, "{}", p),
            DeleteReason::Hash(d) => write!(f, "hash:{}", d),
        }
    }
}

/// The decision attached to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NoOp,
    Delete(DeleteReason),
    Rename(String),
    /// Directory left without children after its subtree was processed.
    DeleteIfEmpty,
}

/// Classifies one entry against the rule set.
///
/// `digest` is called at most once, and only for regular files when the rule
/// set has digests configured.
pub fn classify<F>(entry: Entry<'_>, rules: &RuleSet, digest: F) -> Action
where
    F: FnOnce() -> Option<String>,
{
    if let Some(pattern) = rules.remove_match(entry.name) {
        return Action::Delete(DeleteReason::Pattern(pattern.to_string()));
    }

    if entry.kind == EntryKind::File && rules.has_hashes() {
        if let Some(d) = digest() {
            if rules.matches_hash(&d) {
                return Action::Delete(DeleteReason::Hash(d));
            }
        }
    }

    let cleaned = rules.apply_cleanup(entry.name);
    if cleaned != entry.name && is_usable_name(&cleaned) {
        return Action::Rename(cleaned);
    }

    Action::NoOp
}

#[cfg(windows)]
fn is_invalid_char(c: char) -> bool {
    c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}

#[cfg(not(windows))]
fn is_invalid_char(c: char) -> bool {
    c == '/' || c == '\0'
}

/// Whether `name` can be used as a single path component on this host.
pub fn is_usable_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.chars().any(is_invalid_char) {
        return false;
    }
    #[cfg(windows)]
    {
        if name.chars().all(|c| c == ' ' || c == '.') {
            return false;
        }
    }
    true
}

/// Whether `name` is one of the protected temp/staging directory names.
pub fn is_temp_name(name: &str, temp_names: &[String]) -> bool {
    temp_names.iter().any(|t| t == name)
}
