// declutter-core/tests/walker_tests.rs
//! End-to-end walks over scratch trees built with `tempfile`.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use test_log::test;

use declutter_core::{
    run, Action, Digester, Families, Failure, Mode, Outcome, PatternConfig, PreviewExecutor,
    PruneExecutor, RuleSet, Sha256Digester, TraversalResult, WalkOptions,
};

/// Digester that can never read a file.
struct LockedDigester;

impl Digester for LockedDigester {
    fn digest(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
    }
}

fn patterns(remove: &[&str], hashes: &[&str], cleanup: &[&str]) -> PatternConfig {
    PatternConfig {
        remove: remove.iter().map(|s| s.to_string()).collect(),
        remove_hash: hashes.iter().map(|s| s.to_string()).collect(),
        cleanup: cleanup.iter().map(|s| s.to_string()).collect(),
    }
}

fn walk(root: &Path, config: &PatternConfig, options: &WalkOptions, mode: Mode) -> Result<TraversalResult> {
    let rules = RuleSet::compile(config, &options.families);
    let result = match mode {
        Mode::Preview => run(root, &rules, options, &PreviewExecutor, &Sha256Digester)?,
        Mode::Prune => run(root, &rules, options, &PruneExecutor, &Sha256Digester)?,
    };
    Ok(result)
}

fn touch(path: PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, "content")?;
    Ok(())
}

fn scratch() -> Result<TempDir> {
    Ok(tempdir()?)
}

#[test]
fn strips_unwanted_words_from_file_names() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("粗鄙的词汇123.txt"))?;

    let config = patterns(&[], &[], &["粗鄙的词汇"]);
    let result = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;

    assert!(dir.path().join("123.txt").exists());
    assert!(!dir.path().join("粗鄙的词汇123.txt").exists());
    assert_eq!(result.summary().renamed, 1);
    assert_eq!(result.records[0].outcome, Outcome::Applied);
    Ok(())
}

#[test]
fn prefix_regex_removes_only_whole_name_matches() -> Result<()> {
    let dir = scratch()?;
    fs::create_dir(dir.path().join("@@@junk"))?;
    touch(dir.path().join("@@@junk").join("keep.txt"))?;
    touch(dir.path().join("@@@"))?;

    let config = patterns(&["/^[-@]+$"], &[], &["^[-@]+"]);
    walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;

    assert!(!dir.path().join("@@@").exists());
    assert!(dir.path().join("junk").join("keep.txt").exists());
    assert!(!dir.path().join("@@@junk").exists());
    Ok(())
}

#[test]
fn emptied_directories_are_removed_bottom_up() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("a").join("b").join("sample.url"))?;
    touch(dir.path().join("keep.txt"))?;

    let config = patterns(&["*.url"], &[], &[]);
    let result = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;

    assert!(!dir.path().join("a").exists());
    assert!(dir.path().join("keep.txt").exists());
    assert!(dir.path().exists(), "the target itself is never removed");

    let order: Vec<(PathBuf, Action)> = result.actions();
    assert_eq!(
        order.iter().map(|(p, _)| p.clone()).collect::<Vec<_>>(),
        vec![
            dir.path().join("a").join("b").join("sample.url"),
            dir.path().join("a").join("b"),
            dir.path().join("a"),
        ]
    );
    assert_eq!(order[1].1, Action::DeleteIfEmpty);
    assert_eq!(order[2].1, Action::DeleteIfEmpty);
    assert_eq!(result.summary().empty_dirs, 2);
    Ok(())
}

#[test]
fn empty_dir_removal_can_be_disabled() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("a").join("b").join("sample.url"))?;

    let options = WalkOptions { empty_dirs: false, ..WalkOptions::default() };
    walk(dir.path(), &patterns(&["*.url"], &[], &[]), &options, Mode::Prune)?;

    assert!(dir.path().join("a").join("b").exists());
    assert!(!dir.path().join("a").join("b").join("sample.url").exists());
    Ok(())
}

#[test]
fn hash_matching_is_opt_in() -> Result<()> {
    let dir = scratch()?;
    fs::write(dir.path().join("ad.txt"), "abc")?;
    let sha_abc = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    let config = patterns(&[], &[sha_abc], &[]);

    let result = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;
    assert!(dir.path().join("ad.txt").exists());
    assert!(result.records.is_empty());

    let options = WalkOptions {
        families: Families { hash_match: true, ..Families::default() },
        ..WalkOptions::default()
    };
    let result = walk(dir.path(), &config, &options, Mode::Prune)?;
    assert!(!dir.path().join("ad.txt").exists());
    assert_eq!(result.summary().deleted, 1);
    Ok(())
}

#[test]
fn unreadable_content_is_reported_and_cleanup_still_applies() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("locked [x].bin"))?;
    touch(dir.path().join("plain.bin"))?;

    let sha_abc = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    let config = patterns(&[], &[sha_abc], &[r"\s*\[x\]"]);
    let options = WalkOptions {
        families: Families { hash_match: true, ..Families::default() },
        ..WalkOptions::default()
    };
    let rules = RuleSet::compile(&config, &options.families);
    let result = run(dir.path(), &rules, &options, &PreviewExecutor, &LockedDigester)?;

    let failed: Vec<_> = result.failures().map(|r| r.path.clone()).collect();
    assert_eq!(
        failed,
        vec![dir.path().join("locked [x].bin"), dir.path().join("plain.bin")]
    );
    assert!(result
        .failures()
        .all(|r| r.outcome == Outcome::Failed(Failure::PermissionDenied) && r.action == Action::NoOp));

    let summary = result.summary();
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.renamed, 1);
    assert!(result.untouched.is_empty());
    assert!(result
        .records
        .iter()
        .any(|r| r.action == Action::Rename("locked.bin".into()) && r.outcome == Outcome::Planned));
    Ok(())
}

#[cfg(unix)]
#[test]
fn unlistable_directory_gets_a_single_failure_record() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch()?;
    let locked = dir.path().join("locked [x]");
    touch(locked.join("inner.txt"))?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;
    if fs::read_dir(&locked).is_ok() {
        // Privileged users can list it anyway.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let config = patterns(&[], &[], &[r"\s*\[x\]"]);
    let result = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    let result = result?;

    let records: Vec<_> = result.records.iter().filter(|r| r.path == locked).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, Outcome::Failed(Failure::PermissionDenied));
    assert!(locked.exists());
    Ok(())
}

#[test]
fn rename_collision_is_a_conflict_and_the_walk_continues() -> Result<()> {
    let dir = scratch()?;
    fs::write(dir.path().join("foo (1).txt"), "new")?;
    fs::write(dir.path().join("foo.txt"), "old")?;
    touch(dir.path().join("bar (1).txt"))?;

    let config = patterns(&[], &[], &[r" \(\d+\)"]);

    let preview = walk(dir.path(), &config, &WalkOptions::default(), Mode::Preview)?;
    let prune = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;

    assert_eq!(fs::read_to_string(dir.path().join("foo.txt"))?, "old");
    assert!(dir.path().join("foo (1).txt").exists());
    assert!(dir.path().join("bar.txt").exists());

    for result in [&preview, &prune] {
        let conflict = result
            .records
            .iter()
            .find(|r| r.path.ends_with("foo (1).txt"))
            .expect("conflict recorded");
        assert_eq!(
            conflict.outcome,
            Outcome::Failed(Failure::Conflict { target: dir.path().join("foo.txt") })
        );
        assert_eq!(result.summary().conflicts, 1);
        assert_eq!(result.summary().renamed, 1);
    }
    assert!(prune.exit_ok());
    Ok(())
}

#[test]
fn sibling_renames_to_the_same_name_conflict_in_preview_too() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("a-x.txt"))?;
    touch(dir.path().join("a-y.txt"))?;

    let config = patterns(&[], &[], &["-[xy]"]);
    let preview = walk(dir.path(), &config, &WalkOptions::default(), Mode::Preview)?;
    assert_eq!(preview.summary().renamed, 1);
    assert_eq!(preview.summary().conflicts, 1);

    let prune = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;
    assert_eq!(preview.actions(), prune.actions());
    assert_eq!(prune.summary().conflicts, 1);
    Ok(())
}

#[test]
fn preview_changes_nothing_and_predicts_execution() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("show [www.site.com]").join("ep1 [www.site.com].mkv"))?;
    touch(dir.path().join("show [www.site.com]").join("visit.url"))?;
    touch(dir.path().join("extras").join("promo.url"))?;
    touch(dir.path().join("readme.txt"))?;

    let config = patterns(&["*.url"], &[], &[r"\s*\[www\.[a-z]+\.com\]"]);
    let preview = walk(dir.path(), &config, &WalkOptions::default(), Mode::Preview)?;

    assert!(dir.path().join("show [www.site.com]").join("visit.url").exists());
    assert!(dir.path().join("extras").exists());
    assert!(preview.records.iter().all(|r| r.outcome == Outcome::Planned));

    let prune = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;
    assert_eq!(preview.actions(), prune.actions());
    assert!(prune.records.iter().all(|r| r.outcome == Outcome::Applied));

    assert!(dir.path().join("show").join("ep1.mkv").exists());
    assert!(!dir.path().join("show").join("visit.url").exists());
    assert!(!dir.path().join("extras").exists());
    assert!(dir.path().join("readme.txt").exists());
    Ok(())
}

#[test]
fn directory_matching_remove_is_deleted_with_its_subtree() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("__MACOSX").join("x").join("._a"))?;
    touch(dir.path().join("__MACOSX").join("._b"))?;

    let result = walk(dir.path(), &patterns(&["__MACOSX"], &[], &[]), &WalkOptions::default(), Mode::Prune)?;
    assert!(!dir.path().join("__MACOSX").exists());
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].descendants, 3);
    assert_eq!(result.summary().deleted, 4);
    Ok(())
}

#[test]
fn temp_areas_are_skipped_when_enabled() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join(".tmp").join("partial.url"))?;
    touch(dir.path().join("done.url"))?;

    let options = WalkOptions { skip_tmp: true, ..WalkOptions::default() };
    let result = walk(dir.path(), &patterns(&["*.url"], &[], &[]), &options, Mode::Prune)?;

    assert!(dir.path().join(".tmp").join("partial.url").exists());
    assert!(!dir.path().join("done.url").exists());
    assert_eq!(result.skipped, vec![dir.path().join(".tmp")]);
    Ok(())
}

#[test]
fn target_inside_temp_area_skips_the_run() -> Result<()> {
    let dir = scratch()?;
    let inner = dir.path().join(".tmp").join("job");
    touch(inner.join("partial.url"))?;

    let options = WalkOptions { skip_tmp: true, ..WalkOptions::default() };
    let result = walk(&inner, &patterns(&["*.url"], &[], &[]), &options, Mode::Prune)?;
    assert!(inner.join("partial.url").exists());
    assert!(result.records.is_empty());
    assert_eq!(result.skipped, vec![inner.clone()]);

    let result = walk(&inner, &patterns(&["*.url"], &[], &[]), &WalkOptions::default(), Mode::Prune)?;
    assert!(!inner.join("partial.url").exists());
    assert_eq!(result.summary().deleted, 1);
    Ok(())
}

#[test]
fn nested_config_governs_its_subtree() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("a.log"))?;
    touch(dir.path().join("sub").join("b.log"))?;
    touch(dir.path().join("sub").join("c.bak"))?;
    fs::write(dir.path().join("sub").join(".cleanup-patterns.yml"), "remove: |\n  *.bak\n")?;

    let result = walk(dir.path(), &patterns(&["*.log"], &[], &[]), &WalkOptions::default(), Mode::Prune)?;

    assert!(!dir.path().join("a.log").exists());
    assert!(dir.path().join("sub").join("b.log").exists());
    assert!(!dir.path().join("sub").join("c.bak").exists());
    assert!(dir.path().join("sub").join(".cleanup-patterns.yml").exists());
    assert_eq!(result.summary().deleted, 2);
    Ok(())
}

#[test]
fn config_files_are_never_touched() -> Result<()> {
    let dir = scratch()?;
    fs::write(dir.path().join("cleanup-patterns.yml"), "remove: '*'\n")?;
    touch(dir.path().join("x.yml"))?;

    walk(dir.path(), &patterns(&["*.yml"], &[], &[]), &WalkOptions::default(), Mode::Prune)?;
    assert!(dir.path().join("cleanup-patterns.yml").exists());
    assert!(!dir.path().join("x.yml").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinks_are_classified_by_name_and_not_followed() -> Result<()> {
    let dir = scratch()?;
    let outside = scratch()?;
    touch(outside.path().join("victim.url"))?;
    std::os::unix::fs::symlink(outside.path(), dir.path().join("link"))?;
    std::os::unix::fs::symlink(outside.path().join("victim.url"), dir.path().join("shortcut.url"))?;

    walk(dir.path(), &patterns(&["*.url"], &[], &[]), &WalkOptions::default(), Mode::Prune)?;

    assert!(outside.path().join("victim.url").exists());
    assert!(fs::symlink_metadata(dir.path().join("link")).is_ok());
    assert!(fs::symlink_metadata(dir.path().join("shortcut.url")).is_err());
    Ok(())
}

#[test]
fn cleaning_twice_changes_nothing_the_second_time() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("aabb-movie.mkv"))?;

    let config = patterns(&[], &[], &["ab"]);
    walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;
    assert!(dir.path().join("-movie.mkv").exists());

    let second = walk(dir.path(), &config, &WalkOptions::default(), Mode::Prune)?;
    assert!(second.records.is_empty());
    Ok(())
}

#[test]
fn statistics_count_dirs_and_files() -> Result<()> {
    let dir = scratch()?;
    touch(dir.path().join("a").join("one.txt"))?;
    touch(dir.path().join("a").join("two.txt"))?;
    touch(dir.path().join("three.txt"))?;

    let result = walk(dir.path(), &PatternConfig::default(), &WalkOptions::default(), Mode::Preview)?;
    assert_eq!(result.stats.dirs, 1);
    assert_eq!(result.stats.files, 3);
    assert!(result.records.is_empty());
    assert_eq!(result.untouched.len(), 4);
    Ok(())
}

#[test]
fn missing_target_is_fatal() {
    let rules = RuleSet::default();
    let err = run(
        Path::new("/no/such/target/dir"),
        &rules,
        &WalkOptions::default(),
        &PreviewExecutor,
        &Sha256Digester,
    )
    .unwrap_err();
    assert!(matches!(err, declutter_core::DeclutterError::TargetPathNotFound(_)));
}
