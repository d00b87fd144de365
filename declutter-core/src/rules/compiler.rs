//! compiler.rs - Turns a `PatternConfig` into a ready-to-match `RuleSet`.
//!
//! Wildcard specifiers become whole-name glob matchers, `/`-prefixed remove
//! specifiers and cleanup specifiers become case-insensitive regular
//! expressions. Everything is compiled once and reused for every entry. A
//! pattern that fails to compile is reported and skipped; it never aborts the
//! run.
//!
//! License: MIT OR APACHE 2.0

use globset::{GlobBuilder, GlobMatcher};
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fmt;

use crate::config::{PatternConfig, MAX_PATTERN_LENGTH};

/// Compiled-size cap for a single regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Which pattern families take part in a run.
///
/// A disabled family compiles to an empty matcher list, so the classifier
/// never has to look at these switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Families {
    pub remove: bool,
    pub rename: bool,
    pub hash_match: bool,
}

impl Default for Families {
    fn default() -> Self {
        Self {
            remove: true,
            rename: true,
            hash_match: false,
        }
    }
}

/// A pattern that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPattern {
    pub family: &'static str,
    pub pattern: String,
    pub reason: String,
}

impl fmt::Display for InvalidPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} pattern '{}': {}", self.family, self.pattern, self.reason)
    }
}

#[derive(Debug, Clone)]
enum RemoveKind {
    Glob(GlobMatcher),
    Regex(Regex),
}

/// One compiled `remove` specifier.
#[derive(Debug, Clone)]
pub struct RemoveMatcher {
    kind: RemoveKind,
    /// The specifier as written in the config.
    pub source: String,
}

impl RemoveMatcher {
    pub fn is_match(&self, name: &str) -> bool {
        match &self.kind {
            RemoveKind::Glob(glob) => glob.is_match(name),
            RemoveKind::Regex(re) => re.is_match(name),
        }
    }
}

/// One compiled `cleanup` expression.
#[derive(Debug, Clone)]
pub struct CleanupPattern {
    regex: Regex,
    pub source: String,
}

/// The compiled form of all three families.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    remove: Vec<RemoveMatcher>,
    remove_hash: HashSet<String>,
    cleanup: Vec<CleanupPattern>,
    invalid: Vec<InvalidPattern>,
}

fn check_length(family: &'static str, pattern: &str) -> Result<(), InvalidPattern> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(InvalidPattern {
            family,
            pattern: pattern.to_string(),
            reason: format!(
                "pattern length ({}) exceeds maximum allowed ({})",
                pattern.len(),
                MAX_PATTERN_LENGTH
            ),
        });
    }
    Ok(())
}

fn build_regex(family: &'static str, source: &str, expr: &str) -> Result<Regex, InvalidPattern> {
    RegexBuilder::new(expr)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| InvalidPattern {
            family,
            pattern: source.to_string(),
            reason: e.to_string(),
        })
}

/// Compiles one `remove` specifier: `/regex` or a wildcard.
pub fn compile_remove(spec: &str) -> Result<RemoveMatcher, InvalidPattern> {
    check_length("remove", spec)?;
    let kind = match spec.strip_prefix('/') {
        Some(expr) => {
            let anchored = format!("^(?:{})$", expr);
            RemoveKind::Regex(build_regex("remove", spec, &anchored)?)
        }
        None => {
            let glob = GlobBuilder::new(spec)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|e| InvalidPattern {
                    family: "remove",
                    pattern: spec.to_string(),
                    reason: e.to_string(),
                })?;
            RemoveKind::Glob(glob.compile_matcher())
        }
    };
    Ok(RemoveMatcher {
        kind,
        source: spec.to_string(),
    })
}

/// Compiles one `cleanup` expression.
pub fn compile_cleanup(spec: &str) -> Result<CleanupPattern, InvalidPattern> {
    check_length("cleanup", spec)?;
    Ok(CleanupPattern {
        regex: build_regex("cleanup", spec, spec)?,
        source: spec.to_string(),
    })
}

/// Normalises one `remove_hash` entry to lower-case hex.
pub fn compile_digest(spec: &str) -> Result<String, InvalidPattern> {
    let digest = spec.trim().to_ascii_lowercase();
    hex::decode(&digest).map_err(|e| InvalidPattern {
        family: "remove_hash",
        pattern: spec.to_string(),
        reason: format!("not a hex digest ({})", e),
    })?;
    Ok(digest)
}

impl RuleSet {
    /// Compiles every enabled family of `config`. Invalid patterns are logged,
    /// kept in [`RuleSet::invalid_patterns`] and skipped.
    pub fn compile(config: &PatternConfig, families: &Families) -> Self {
        let mut rules = RuleSet::default();

        if families.remove {
            for spec in &config.remove {
                match compile_remove(spec) {
                    Ok(m) => {
                        debug!("Remove pattern '{}' compiled successfully.", spec);
                        rules.remove.push(m);
                    }
                    Err(e) => rules.reject(e),
                }
            }
        }

        if families.hash_match {
            for spec in &config.remove_hash {
                match compile_digest(spec) {
                    Ok(d) => {
                        rules.remove_hash.insert(d);
                    }
                    Err(e) => rules.reject(e),
                }
            }
        }

        if families.rename {
            for spec in &config.cleanup {
                match compile_cleanup(spec) {
                    Ok(p) => {
                        debug!("Cleanup pattern '{}' compiled successfully.", spec);
                        rules.cleanup.push(p);
                    }
                    Err(e) => rules.reject(e),
                }
            }
        }

        debug!(
            "Rule set ready: {} remove, {} digests, {} cleanup, {} invalid.",
            rules.remove.len(),
            rules.remove_hash.len(),
            rules.cleanup.len(),
            rules.invalid.len()
        );
        rules
    }

    fn reject(&mut self, invalid: InvalidPattern) {
        warn!("Skipping invalid {}", invalid);
        self.invalid.push(invalid);
    }

    /// Returns the first `remove` specifier matching the whole `name`.
    pub fn remove_match(&self, name: &str) -> Option<&str> {
        self.remove
            .iter()
            .find(|m| m.is_match(name))
            .map(|m| m.source.as_str())
    }

    pub fn matches_remove(&self, name: &str) -> bool {
        self.remove_match(name).is_some()
    }

    pub fn matches_hash(&self, digest: &str) -> bool {
        !self.remove_hash.is_empty() && self.remove_hash.contains(&digest.to_ascii_lowercase())
    }

    /// Whether any digest is configured, i.e. whether hashing a file can matter.
    pub fn has_hashes(&self) -> bool {
        !self.remove_hash.is_empty()
    }

    /// Strips every match of every cleanup pattern, in configured order.
    ///
    /// The ordered pass is repeated until the name stops changing, so the
    /// result is a fixed point: cleaning it again yields the same name. Each
    /// changing pass makes the name strictly shorter, which bounds the loop.
    pub fn apply_cleanup(&self, name: &str) -> String {
        let mut current = name.to_string();
        loop {
            let mut next = current.clone();
            for pattern in &self.cleanup {
                next = pattern.regex.replace_all(&next, "").into_owned();
            }
            if next == current {
                return current;
            }
            current = next;
        }
    }

    pub fn invalid_patterns(&self) -> &[InvalidPattern] {
        &self.invalid
    }

    /// True when no family has any usable pattern.
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.remove_hash.is_empty() && self.cleanup.is_empty()
    }
}
