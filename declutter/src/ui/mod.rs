//! Terminal output: theme handling, message helpers and report rendering.

pub mod output_format;
pub mod report;
pub mod theme;
pub mod tree;
