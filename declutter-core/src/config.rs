//! Pattern configuration for `declutter-core`.
//!
//! A config file carries three independent pattern families:
//!
//! * `remove` - wildcard specifiers, or `/`-prefixed regular expressions, whose
//!   whole-name match marks an entry for deletion.
//! * `remove_hash` - content digests; a regular file whose digest is listed is
//!   deleted (only when hash matching is enabled).
//! * `cleanup` - regular expressions whose matches are stripped from names.
//!
//! Every key accepts either a block string with one specifier per line or a
//! YAML sequence. Absent keys mean an empty family. Blank lines are skipped;
//! every other line is a specifier, including ones starting with `#`. Other
//! top-level keys are ignored with a warning.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DeclutterError;

/// Maximum allowed length for a single pattern specifier.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Config filenames recognised in every search location, in lookup order.
pub const CONFIG_FILENAMES: [&str; 4] = [
    ".cleanup-patterns.yml",
    "cleanup-patterns.yml",
    ".cleanup-patterns.yaml",
    "cleanup-patterns.yaml",
];

/// Returns true when `name` is one of the recognised config filenames.
pub fn is_config_filename(name: &str) -> bool {
    CONFIG_FILENAMES.contains(&name)
}

/// Raw shape of a family value in YAML: a block string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPatternList {
    Block(String),
    List(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
struct RawPatternConfig {
    #[serde(default)]
    remove: Option<RawPatternList>,
    #[serde(default)]
    remove_hash: Option<RawPatternList>,
    #[serde(default)]
    cleanup: Option<RawPatternList>,
    #[serde(flatten)]
    other: BTreeMap<String, serde_yml::Value>,
}

/// The three pattern families as loaded from a config file, in configured order.
///
/// Immutable after load; compile it into a [`crate::RuleSet`] before matching.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PatternConfig {
    pub remove: Vec<String>,
    pub remove_hash: Vec<String>,
    pub cleanup: Vec<String>,
}

fn split_specifiers(raw: Option<RawPatternList>, trim: bool) -> Vec<String> {
    let lines: Vec<String> = match raw {
        None => return Vec::new(),
        Some(RawPatternList::Block(text)) => text.lines().map(str::to_string).collect(),
        Some(RawPatternList::List(items)) => items,
    };

    lines
        .into_iter()
        .map(|line| {
            let line = line.trim_end_matches('\r');
            if trim { line.trim().to_string() } else { line.to_string() }
        })
        .filter(|line| !line.trim().is_empty())
        .collect()
}

impl PatternConfig {
    /// Parses config text. Unknown top-level keys are logged and ignored.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yml::Error> {
        // An empty document deserializes as unit, treat it as "no rules".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawPatternConfig = serde_yml::from_str(text)?;
        for key in raw.other.keys() {
            warn!("Ignoring unknown config key '{}'", key);
        }
        Ok(Self {
            remove: split_specifiers(raw.remove, false),
            remove_hash: split_specifiers(raw.remove_hash, true),
            cleanup: split_specifiers(raw.cleanup, false),
        })
    }

    /// Loads and parses a config file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DeclutterError> {
        let path = path.as_ref();
        info!("Loading cleanup patterns from: {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| DeclutterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text).map_err(|source| DeclutterError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Loaded {} remove, {} remove_hash and {} cleanup patterns from {}.",
            config.remove.len(),
            config.remove_hash.len(),
            config.cleanup.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.remove_hash.is_empty() && self.cleanup.is_empty()
    }
}

/// Returns the first recognised config file inside `dir`, if any.
pub fn config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
