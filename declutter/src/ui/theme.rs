//! Module for managing the output theme.
//!
//! Each logical part of the report (headers, removal badges, rename targets,
//! failures, messages) can be given a 16-colour ANSI foreground through a
//! YAML theme file. Entries missing from a custom theme keep their default.

use anyhow::{Context, Result};
use owo_colors::AnsiColors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Type alias for the theme map.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeEntry {
    /// Section titles such as `--- Summary ---`.
    Header,
    /// The `[-]` badge of a deletion.
    Remove,
    /// The `[*]` badge and new name of a rename.
    Rename,
    /// The `[~]` badge of an empty-directory removal.
    EmptyDir,
    /// The `[!]` badge of a failed action.
    Failure,
    /// Directory names.
    Directory,
    /// Symlink names.
    Symlink,
    /// The pattern shown after a removal at high verbosity.
    Pattern,
    /// Tree branches of the untouched listing.
    Tree,
    Info,
    Warn,
    Error,
}

impl ThemeEntry {
    pub const ALL: [ThemeEntry; 12] = [
        ThemeEntry::Header,
        ThemeEntry::Remove,
        ThemeEntry::Rename,
        ThemeEntry::EmptyDir,
        ThemeEntry::Failure,
        ThemeEntry::Directory,
        ThemeEntry::Symlink,
        ThemeEntry::Pattern,
        ThemeEntry::Tree,
        ThemeEntry::Info,
        ThemeEntry::Warn,
        ThemeEntry::Error,
    ];

    fn default_color(self) -> &'static str {
        match self {
            ThemeEntry::Header => "brightwhite",
            ThemeEntry::Remove => "red",
            ThemeEntry::Rename => "yellow",
            ThemeEntry::EmptyDir => "magenta",
            ThemeEntry::Failure => "brightred",
            ThemeEntry::Directory => "blue",
            ThemeEntry::Symlink => "cyan",
            ThemeEntry::Pattern => "brightblack",
            ThemeEntry::Tree => "brightblack",
            ThemeEntry::Info => "green",
            ThemeEntry::Warn => "yellow",
            ThemeEntry::Error => "red",
        }
    }
}

/// An ANSI colour usable in a theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// A named ANSI color (e.g., "red", "brightgreen").
    Named(String),
}

/// Error type for parsing an invalid `ThemeColor` string.
#[derive(Debug, Clone)]
pub struct ParseThemeColorError;

impl fmt::Display for ParseThemeColorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid theme color; expected one of: black, red, green, yellow, blue, \
            magenta, cyan, white, brightblack, brightred, brightgreen, brightyellow, \
            brightblue, brightmagenta, brightcyan, brightwhite."
        )
    }
}

impl std::error::Error for ParseThemeColorError {}

impl FromStr for ThemeColor {
    type Err = ParseThemeColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "black" | "red" | "green" | "yellow" | "blue" | "magenta" | "cyan" | "white"
            | "brightblack" | "brightred" | "brightgreen" | "brightyellow" | "brightblue"
            | "brightmagenta" | "brightcyan" | "brightwhite" => Ok(ThemeColor::Named(lower)),
            _ => Err(ParseThemeColorError),
        }
    }
}

impl ThemeColor {
    /// Converts the colour name into an `owo_colors::AnsiColors`. Unknown names
    /// fall back to white.
    pub fn to_ansi_color(&self) -> AnsiColors {
        match self {
            ThemeColor::Named(name) => match name.to_lowercase().as_str() {
                "black" => AnsiColors::Black,
                "red" => AnsiColors::Red,
                "green" => AnsiColors::Green,
                "yellow" => AnsiColors::Yellow,
                "blue" => AnsiColors::Blue,
                "magenta" => AnsiColors::Magenta,
                "cyan" => AnsiColors::Cyan,
                "white" => AnsiColors::White,
                "brightblack" => AnsiColors::BrightBlack,
                "brightred" => AnsiColors::BrightRed,
                "brightgreen" => AnsiColors::BrightGreen,
                "brightyellow" => AnsiColors::BrightYellow,
                "brightblue" => AnsiColors::BrightBlue,
                "brightmagenta" => AnsiColors::BrightMagenta,
                "brightcyan" => AnsiColors::BrightCyan,
                "brightwhite" => AnsiColors::BrightWhite,
                _ => AnsiColors::White,
            },
        }
    }
}

/// Style configuration for one `ThemeEntry`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeStyle {
    pub fg: Option<ThemeColor>,
}

/// Loads a theme from a YAML file, or returns the default theme.
pub fn build_theme_map(theme_path: Option<&PathBuf>) -> Result<ThemeMap> {
    match theme_path {
        Some(path) => ThemeStyle::load_from_file(path),
        None => Ok(ThemeStyle::default_theme_map()),
    }
}

impl ThemeStyle {
    /// Loads a theme file and fills in defaults for entries it leaves out.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ThemeMap> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        let mut custom: ThemeMap = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse theme file {}", path.display()))?;

        for (entry, style) in Self::default_theme_map() {
            custom.entry(entry).or_insert(style);
        }
        Ok(custom)
    }

    pub fn default_theme_map() -> ThemeMap {
        ThemeEntry::ALL
            .iter()
            .map(|entry| {
                let style = ThemeStyle {
                    fg: Some(ThemeColor::Named(entry.default_color().into())),
                };
                (*entry, style)
            })
            .collect()
    }
}
