// declutter-core/src/lib.rs
//! # declutter core library
//!
//! `declutter-core` batch-cleans a directory tree. File and directory names are
//! matched against three pattern families loaded from a YAML config:
//!
//! * `remove` - wildcards or `/`-prefixed regexes; a whole-name match deletes
//!   the entry.
//! * `remove_hash` - content digests; matching regular files are deleted when
//!   hash matching is enabled.
//! * `cleanup` - regexes whose matches are stripped from names.
//!
//! ## Modules
//!
//! * `config`: the `PatternConfig` data model and YAML loading.
//! * `resolver`: finds the nearest config for a target path.
//! * `rules`: compiles a config into a `RuleSet`.
//! * `classifier`: the pure per-entry decision function.
//! * `walker`: bottom-up traversal that applies decisions through an executor.
//! * `executor` / `executors`: the `ActionExecutor` trait and its preview and
//!   prune implementations.
//! * `digest`: content hashing for `remove_hash`.
//! * `report`: the `TraversalResult` produced by a run.
//! * `headless`: one-call convenience wrapper.
//!
//! ## Usage Example
//!
//! ```no_run
//! use declutter_core::{clean_tree, Mode, WalkOptions};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let options = WalkOptions::default();
//!     let result = clean_tree(Path::new("downloads"), None, &options, Mode::Preview)?;
//!     let summary = result.summary();
//!     println!("{} to delete, {} to rename", summary.deleted, summary.renamed);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Only a missing target or an unusable explicit config path is fatal
//! ([`DeclutterError`]). Invalid patterns are skipped and listed in the report;
//! per-entry failures are recorded as [`Failure`] outcomes and the walk goes on.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod classifier;
pub mod config;
pub mod digest;
pub mod errors;
pub mod executor;
pub mod executors;
pub mod headless;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod walker;

pub use classifier::{classify, is_usable_name, Action, DeleteReason, Entry, EntryKind};
pub use config::{PatternConfig, CONFIG_FILENAMES, MAX_PATTERN_LENGTH};
pub use digest::{Digester, Sha256Digester};
pub use errors::{DeclutterError, Failure};
pub use executor::ActionExecutor;
pub use executors::preview::PreviewExecutor;
pub use executors::prune::PruneExecutor;
pub use headless::clean_tree;
pub use report::{Mode, Outcome, Record, Stats, Summary, TraversalResult};
pub use resolver::{resolve, search_locations, ConfigSource, ResolvedConfig};
pub use rules::compiler::{Families, InvalidPattern, RuleSet};
pub use walker::{run, WalkOptions, Walker, DEFAULT_TEMP_NAME};
