//! Pattern source resolution.
//!
//! Finds the config file that applies to a target path. Locations are tried in
//! order: the target itself, each of its ancestors up to the filesystem root,
//! the user's home directory, then the directory holding the running binary.
//! The first location holding a recognised config file wins; levels are never
//! merged. Finding nothing is a valid "no rules" run.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::config::{config_file_in, PatternConfig};
use crate::errors::DeclutterError;

/// Where the active patterns came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed explicitly by the caller.
    Explicit(PathBuf),
    /// Found by searching upward from the target.
    Discovered(PathBuf),
    /// Nothing found; all families are empty.
    NoRules,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Discovered(p) => Some(p),
            ConfigSource::NoRules => None,
        }
    }
}

/// A loaded config together with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: PatternConfig,
    pub source: ConfigSource,
}

/// Builds the ordered, de-duplicated list of directories searched for a config.
///
/// Pure: the home and install directories are passed in so the precedence can
/// be checked against constructed paths.
pub fn search_locations(
    start: &Path,
    home: Option<&Path>,
    install_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut locations: Vec<PathBuf> = Vec::new();
    let tail = home.into_iter().chain(install_dir);
    for dir in start.ancestors().chain(tail) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        if !locations.iter().any(|seen| seen == dir) {
            locations.push(dir.to_path_buf());
        }
    }
    locations
}

/// Directory containing the running program, if it can be determined.
pub fn install_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Finds the nearest config file for `start` using the default home and
/// install directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    let home = dirs::home_dir();
    let install = install_dir();
    search_locations(&start, home.as_deref(), install.as_deref())
        .into_iter()
        .inspect(|dir| debug!("Looking for cleanup patterns in {}", dir.display()))
        .find_map(|dir| config_file_in(&dir))
}

/// Resolves the pattern config for a run.
///
/// With an explicit path the search is bypassed and any read or parse failure
/// is returned. Without one, a discovered file that fails to load degrades to
/// "no rules" with a warning.
pub fn resolve(start: &Path, explicit: Option<&Path>) -> Result<ResolvedConfig, DeclutterError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(DeclutterError::ConfigNotFound(path.to_path_buf()));
        }
        let config = PatternConfig::load_from_file(path)?;
        return Ok(ResolvedConfig {
            config,
            source: ConfigSource::Explicit(path.to_path_buf()),
        });
    }

    let Some(found) = find_config_file(start) else {
        info!(
            "No cleanup patterns found for {}; running with no rules.",
            start.display()
        );
        return Ok(ResolvedConfig {
            config: PatternConfig::default(),
            source: ConfigSource::NoRules,
        });
    };

    match PatternConfig::load_from_file(&found) {
        Ok(config) => Ok(ResolvedConfig {
            config,
            source: ConfigSource::Discovered(found),
        }),
        Err(e) => {
            warn!("Ignoring unusable config file: {}", e);
            Ok(ResolvedConfig {
                config: PatternConfig::default(),
                source: ConfigSource::NoRules,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn search_order_is_target_ancestors_home_install() {
        let locations = search_locations(
            Path::new("/data/downloads/show"),
            Some(Path::new("/home/me")),
            Some(Path::new("/opt/declutter/bin")),
        );
        let expected: Vec<PathBuf> = [
            "/data/downloads/show",
            "/data/downloads",
            "/data",
            "/",
            "/home/me",
            "/opt/declutter/bin",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(locations, expected);
    }

    #[test]
    #[cfg(unix)]
    fn duplicate_locations_keep_first_position() {
        let locations = search_locations(
            Path::new("/home/me/inbox"),
            Some(Path::new("/home/me")),
            Some(Path::new("/home/me/inbox")),
        );
        let expected: Vec<PathBuf> = ["/home/me/inbox", "/home/me", "/home", "/"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(locations, expected);
    }

    #[test]
    #[cfg(unix)]
    fn missing_home_and_install_are_skipped() {
        let locations = search_locations(Path::new("/a"), None, None);
        assert_eq!(locations, vec![PathBuf::from("/a"), PathBuf::from("/")]);
    }

    #[test]
    fn explicit_missing_config_is_fatal() {
        let err = resolve(Path::new("."), Some(Path::new("/definitely/not/here.yml"))).unwrap_err();
        assert!(matches!(err, DeclutterError::ConfigNotFound(_)));
    }
}
