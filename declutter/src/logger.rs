// declutter/src/logger.rs
//! Logger setup for the declutter binary.
//!
//! Log records go to stderr through `env_logger`. Without an explicit level the
//! `RUST_LOG` environment variable applies, falling back to `warn`.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Maps the `-v` count to a log level. `None` leaves the choice to `RUST_LOG`.
pub fn level_for_verbosity(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Initializes the global logger. Safe to call more than once; later calls
/// are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(Target::Stderr);
    let _ = builder.try_init();
}
