//! Concrete `ActionExecutor` implementations.
//!
//! * `preview` - dry run, records every action as planned.
//! * `prune` - applies actions to the filesystem.

pub mod preview;
pub mod prune;
