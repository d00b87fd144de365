// declutter/src/lib.rs
//! # declutter CLI
//!
//! Terminal front end for `declutter-core`: argument parsing, logging setup,
//! and a themed console report of what a run did (or would do).
//!
//! License: MIT OR Apache-2.0

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
