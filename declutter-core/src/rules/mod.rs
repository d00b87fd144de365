//! Rule compilation for declutter.
//!
//! The `compiler` submodule converts the raw pattern families of a
//! `PatternConfig` into a `RuleSet`: compiled glob and regex matchers, a digest
//! set, and the ordered cleanup expressions, plus a list of patterns that had
//! to be skipped. The `RuleSet` is an explicit value handed to the classifier
//! and the walker; nothing here is global.

pub mod compiler;
