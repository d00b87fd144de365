// declutter/src/cli.rs
//! Command-line interface for the declutter binary.
//!
//! Every behaviour switch comes as an on/off pair; when both halves of a pair
//! are given, the one appearing last on the command line wins.
//! License: MIT OR Apache-2.0

use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

use declutter_core::{Families, Mode, WalkOptions};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "declutter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch-clean a directory tree of junk files and noisy names",
    long_about = "declutter walks a directory tree bottom-up, deletes entries whose names (or contents) match configured remove patterns, strips unwanted words from the remaining names and removes directories left empty. Without --prune it only previews what it would do.",
    args_override_self = true
)]
pub struct Cli {
    /// Directory to clean.
    #[arg(value_name = "TARGET_PATH", default_value = ".")]
    pub target: PathBuf,

    /// Explicit pattern config file; disables the config search.
    #[arg(
        long,
        short = 'c',
        value_name = "FILE",
        help = "Pattern config file. Default: search .cleanup-patterns.yml in TARGET_PATH and its parents, $HOME, then the binary's directory."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'd',
        long = "rm",
        visible_alias = "remove",
        overrides_with = "no_remove",
        help = "Remove entries matching remove patterns (default)."
    )]
    pub remove: bool,

    #[arg(
        short = 'D',
        long = "no-rm",
        visible_alias = "no-remove",
        overrides_with = "remove",
        help = "Do not remove entries matching remove patterns."
    )]
    pub no_remove: bool,

    #[arg(
        short = 'r',
        long = "rename",
        overrides_with = "no_rename",
        help = "Strip cleanup patterns from names (default)."
    )]
    pub rename: bool,

    #[arg(
        short = 'R',
        long = "no-rename",
        overrides_with = "rename",
        help = "Leave names unchanged."
    )]
    pub no_rename: bool,

    #[arg(
        long = "empty",
        visible_alias = "remove-empty-dir",
        overrides_with = "no_empty",
        help = "Remove directories left without children (default)."
    )]
    pub empty: bool,

    #[arg(long = "no-empty", overrides_with = "empty", help = "Keep empty directories.")]
    pub no_empty: bool,

    #[arg(
        long = "enable-hash-match",
        overrides_with = "disable_hash_match",
        help = "Delete files whose SHA-256 digest is listed under remove_hash."
    )]
    pub enable_hash_match: bool,

    #[arg(
        long = "disable-hash-match",
        overrides_with = "enable_hash_match",
        help = "Do not hash file contents (default)."
    )]
    pub disable_hash_match: bool,

    #[arg(
        long = "skip-tmp-in-parents",
        overrides_with = "no_skip_tmp_in_parents",
        help = "Leave .tmp directories alone, and skip the run entirely when TARGET_PATH lies inside one."
    )]
    pub skip_tmp_in_parents: bool,

    #[arg(
        long = "no-skip-tmp-in-parents",
        overrides_with = "skip_tmp_in_parents",
        help = "Treat .tmp directories like any other (default)."
    )]
    pub no_skip_tmp_in_parents: bool,

    /// Apply the changes instead of previewing them.
    #[arg(long, help = "Execute the removals and renames. Without this flag nothing is changed.")]
    pub prune: bool,

    /// Repeat for more detail.
    #[arg(
        long,
        short = 'v',
        action = ArgAction::Count,
        help = "Increase verbosity: -v lists untouched entries, -vvv also shows which pattern matched."
    )]
    pub verbose: u8,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    #[arg(long = "no-color", help = "Disable coloured output.")]
    pub no_color: bool,
}

/// Resolves an on/off flag pair. `overrides_with` has already cleared the
/// half that came first.
fn flag(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

impl Cli {
    pub fn families(&self) -> Families {
        let defaults = Families::default();
        Families {
            remove: flag(self.remove, self.no_remove, defaults.remove),
            rename: flag(self.rename, self.no_rename, defaults.rename),
            hash_match: flag(self.enable_hash_match, self.disable_hash_match, defaults.hash_match),
        }
    }

    pub fn walk_options(&self) -> WalkOptions {
        let defaults = WalkOptions::default();
        WalkOptions {
            families: self.families(),
            empty_dirs: flag(self.empty, self.no_empty, defaults.empty_dirs),
            skip_tmp: flag(self.skip_tmp_in_parents, self.no_skip_tmp_in_parents, defaults.skip_tmp),
            ..defaults
        }
    }

    pub fn mode(&self) -> Mode {
        if self.prune { Mode::Prune } else { Mode::Preview }
    }

    pub fn log_level(&self) -> Option<LevelFilter> {
        crate::logger::level_for_verbosity(self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["declutter"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn defaults_match_documented_behaviour() {
        let cli = parse(&[]);
        let options = cli.walk_options();
        assert_eq!(cli.target, PathBuf::from("."));
        assert!(options.families.remove);
        assert!(options.families.rename);
        assert!(!options.families.hash_match);
        assert!(options.empty_dirs);
        assert!(!options.skip_tmp);
        assert_eq!(cli.mode(), Mode::Preview);
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn last_flag_of_a_pair_wins() {
        assert!(!parse(&["-r", "-R"]).families().rename);
        assert!(parse(&["-R", "-r"]).families().rename);
        assert!(!parse(&["--rm", "--no-remove"]).families().remove);
        assert!(parse(&["-D", "-d"]).families().remove);
        assert!(parse(&["--disable-hash-match", "--enable-hash-match"]).families().hash_match);
        assert!(!parse(&["--remove-empty-dir", "--no-empty"]).walk_options().empty_dirs);
    }

    #[test]
    fn verbosity_and_mode() {
        let cli = parse(&["--prune", "-vv", "some/dir", "-c", "rules.yml"]);
        assert_eq!(cli.mode(), Mode::Prune);
        assert_eq!(cli.log_level(), Some(LevelFilter::Debug));
        assert_eq!(cli.target, PathBuf::from("some/dir"));
        assert_eq!(cli.config, Some(PathBuf::from("rules.yml")));
    }

    #[test]
    fn skip_tmp_switch() {
        assert!(parse(&["--skip-tmp-in-parents"]).walk_options().skip_tmp);
        assert!(!parse(&["--skip-tmp-in-parents", "--no-skip-tmp-in-parents"]).walk_options().skip_tmp);
    }
}
