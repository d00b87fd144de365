//! Themed text helpers shared by the report and the message printers.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Returns `text` coloured for `entry`, or unchanged when colours are off.
pub fn paint(text: &str, entry: ThemeEntry, theme: &ThemeMap, enable_colors: bool) -> String {
    if !enable_colors {
        return text.to_string();
    }
    match theme.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) => text.color(color.to_ansi_color()).to_string(),
        None => text.to_string(),
    }
}

fn print_message<W: Write>(
    writer: &mut W,
    label: &str,
    entry: ThemeEntry,
    msg: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    writeln!(writer, "{} {}", paint(label, entry, theme, enable_colors), msg)
}

pub fn print_info_message<W: Write>(
    writer: &mut W,
    msg: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_message(writer, "info:", ThemeEntry::Info, msg, theme, enable_colors)
}

pub fn print_warn_message<W: Write>(
    writer: &mut W,
    msg: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_message(writer, "warning:", ThemeEntry::Warn, msg, theme, enable_colors)
}

pub fn print_error_message<W: Write>(
    writer: &mut W,
    msg: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    print_message(writer, "error:", ThemeEntry::Error, msg, theme, enable_colors)
}
