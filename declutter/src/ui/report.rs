//! Console rendering of a [`TraversalResult`].
//!
//! Layout:
//!
//! ```text
//! --- Summary ---
//! [-] downloads/ad.url
//! [*] downloads/{ "movie [sample].mkv" => "movie.mkv" }
//! [~] downloads/extras/
//! [!] downloads/foo (1).txt: conflict: 'downloads/foo.txt' already exists
//!
//! --- Statistics ---
//!     Dir Total: 2
//!    File Total: 5
//! ```
//!
//! With verbosity the untouched entries follow as a tree, and from `-vvv` on
//! every removal names the pattern that triggered it.

use std::io::{self, Write};
use std::path::Path;

use declutter_core::{Action, EntryKind, Mode, Outcome, Record, TraversalResult};

use crate::ui::output_format::paint;
use crate::ui::theme::{ThemeEntry, ThemeMap};
use crate::ui::tree::{build_tree, render_tree};

/// How much of the report to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub verbose: u8,
    pub enable_colors: bool,
}

fn trailing_slash(kind: EntryKind) -> &'static str {
    if kind == EntryKind::Dir { "/" } else { "" }
}

fn name_entry(kind: EntryKind) -> Option<ThemeEntry> {
    match kind {
        EntryKind::Dir => Some(ThemeEntry::Directory),
        EntryKind::Symlink => Some(ThemeEntry::Symlink),
        EntryKind::File | EntryKind::Other => None,
    }
}

fn parent_prefix(record: &Record) -> String {
    let parent = record.parent();
    if parent.as_os_str().is_empty() {
        String::new()
    } else {
        format!("{}/", parent.display())
    }
}

fn styled_name(name: &str, kind: EntryKind, theme: &ThemeMap, opts: ReportOptions) -> String {
    match name_entry(kind) {
        Some(entry) => paint(name, entry, theme, opts.enable_colors),
        None => name.to_string(),
    }
}

fn write_delete<W: Write>(
    w: &mut W,
    record: &Record,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    write!(
        w,
        "{} {}{}{}",
        paint("[-]", ThemeEntry::Remove, theme, opts.enable_colors),
        parent_prefix(record),
        styled_name(&record.name(), record.kind, theme, opts),
        trailing_slash(record.kind),
    )?;
    if opts.verbose >= 3 {
        if let Action::Delete(reason) = &record.action {
            let note = format!(" <= {}", reason);
            write!(w, "{}", paint(&note, ThemeEntry::Pattern, theme, opts.enable_colors))?;
        }
    }
    if record.descendants > 0 && opts.verbose >= 1 {
        write!(w, " (+{} inside)", record.descendants)?;
    }
    writeln!(w)
}

fn write_rename<W: Write>(
    w: &mut W,
    record: &Record,
    new_name: &str,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    let old = format!("\"{}\"", record.name());
    let new = format!("\"{}\"", new_name);
    writeln!(
        w,
        "{} {}{{ {} => {} }}{}",
        paint("[*]", ThemeEntry::Rename, theme, opts.enable_colors),
        parent_prefix(record),
        styled_name(&old, record.kind, theme, opts),
        paint(&new, ThemeEntry::Rename, theme, opts.enable_colors),
        trailing_slash(record.kind),
    )
}

fn write_empty_dir<W: Write>(
    w: &mut W,
    record: &Record,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}/",
        paint("[~]", ThemeEntry::EmptyDir, theme, opts.enable_colors),
        record.path.display(),
    )
}

fn write_failure<W: Write>(
    w: &mut W,
    record: &Record,
    reason: &str,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}: {}",
        paint("[!]", ThemeEntry::Failure, theme, opts.enable_colors),
        record.path.display(),
        reason,
    )
}

/// Writes the summary section. Nothing is written when there are no records.
pub fn print_summary<W: Write>(
    result: &TraversalResult,
    w: &mut W,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    if result.records.is_empty() {
        return Ok(());
    }
    writeln!(w, "{}", paint("--- Summary ---", ThemeEntry::Header, theme, opts.enable_colors))?;

    let succeeded = || result.records.iter().filter(|r| !r.outcome.is_failed());
    for record in succeeded().filter(|r| matches!(r.action, Action::Delete(_))) {
        write_delete(w, record, theme, opts)?;
    }
    for record in succeeded() {
        if let Action::Rename(new_name) = &record.action {
            write_rename(w, record, new_name, theme, opts)?;
        }
    }
    for record in succeeded().filter(|r| r.action == Action::DeleteIfEmpty) {
        write_empty_dir(w, record, theme, opts)?;
    }
    for record in result.failures() {
        if let Outcome::Failed(failure) = &record.outcome {
            write_failure(w, record, &failure.to_string(), theme, opts)?;
        }
    }
    Ok(())
}

/// Lists the patterns that were skipped because they did not compile.
pub fn print_invalid_patterns<W: Write>(
    result: &TraversalResult,
    w: &mut W,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    if result.invalid_patterns.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}", paint("--- Invalid Patterns ---", ThemeEntry::Header, theme, opts.enable_colors))?;
    for invalid in &result.invalid_patterns {
        writeln!(w, "{} {}", paint("[?]", ThemeEntry::Warn, theme, opts.enable_colors), invalid)?;
    }
    Ok(())
}

/// Writes the untouched entries of `target` as a tree.
pub fn print_untouched<W: Write>(
    result: &TraversalResult,
    w: &mut W,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    let tree = build_tree(&result.target, &result.untouched);
    if tree.children.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}", paint("--- Untouched ---", ThemeEntry::Header, theme, opts.enable_colors))?;
    writeln!(w, "{}", display_root(&result.target))?;
    for line in render_tree(&tree) {
        writeln!(w, "{}", paint(&line, ThemeEntry::Tree, theme, opts.enable_colors))?;
    }
    Ok(())
}

fn display_root(target: &Path) -> String {
    format!("{}/", target.display().to_string().trim_end_matches('/'))
}

/// Writes the statistics block.
pub fn print_statistics<W: Write>(
    result: &TraversalResult,
    w: &mut W,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    let summary = result.summary();
    let (removed, renamed) = match result.mode {
        Mode::Preview => ("To Remove", "To Rename"),
        Mode::Prune => ("Removed", "Renamed"),
    };
    writeln!(w)?;
    writeln!(w, "{}", paint("--- Statistics ---", ThemeEntry::Header, theme, opts.enable_colors))?;
    let rows = [
        ("Dir Total", result.stats.dirs),
        ("File Total", result.stats.files),
        (removed, summary.deleted),
        (renamed, summary.renamed),
        ("Empty Dirs", summary.empty_dirs),
        ("Conflicts", summary.conflicts),
        ("Failures", summary.failed),
    ];
    for (label, value) in rows {
        writeln!(w, "{:>13}: {}", label, value)?;
    }
    Ok(())
}

/// Writes the full report: summary, skipped patterns, optional tree, statistics.
pub fn print_report<W: Write>(
    result: &TraversalResult,
    w: &mut W,
    theme: &ThemeMap,
    opts: ReportOptions,
) -> io::Result<()> {
    print_summary(result, w, theme, opts)?;
    print_invalid_patterns(result, w, theme, opts)?;
    if opts.verbose >= 1 {
        print_untouched(result, w, theme, opts)?;
    }
    print_statistics(result, w, theme, opts)
}
