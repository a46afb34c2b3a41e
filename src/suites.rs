//! Test suite discovery
//!
//! A suite is a file in the suites directory whose name carries the suite
//! suffix (`.test.ts` by default). Its bare name is what `-t` accepts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::common::config::SuitesConfig;
use crate::common::{Error, Result};

/// Discovered suites, keyed by bare name in sorted order
#[derive(Debug, Clone, Default)]
pub struct Suites {
    by_name: BTreeMap<String, PathBuf>,
}

impl Suites {
    /// Scan the first existing candidate directory
    pub fn discover(config: &SuitesConfig) -> Result<Self> {
        let dir = config
            .dirs
            .iter()
            .find(|d| d.is_dir())
            .ok_or_else(|| Error::suites_dir_not_found(&config.dirs))?;

        tracing::debug!("Discovering suites in {}", dir.display());
        Self::scan(dir, &config.suffix, &config.backup_marker)
    }

    /// Scan one directory
    pub fn scan(dir: &Path, suffix: &str, backup_marker: &str) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|source| Error::SuitesDirRead {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut by_name = BTreeMap::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let is_backup = !backup_marker.is_empty() && file_name.contains(backup_marker);
            if !file_name.contains(suffix) || is_backup {
                continue;
            }
            let name = file_name.replacen(suffix, "", 1);
            by_name.insert(name, dir.join(file_name));
        }

        tracing::debug!("Found {} suite(s)", by_name.len());
        Ok(Self { by_name })
    }

    /// Path of a suite by bare name
    pub fn get(&self, name: &str) -> Option<&PathBuf> {
        self.by_name.get(name)
    }

    /// Every suite path in name order
    pub fn all_paths(&self) -> Vec<PathBuf> {
        self.by_name.values().cloned().collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

impl FromIterator<(String, PathBuf)> for Suites {
    fn from_iter<I: IntoIterator<Item = (String, PathBuf)>>(iter: I) -> Self {
        Self {
            by_name: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_scan_filters_and_names() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "autoPlay.test.ts");
        touch(tmp.path(), "basicActions.test.ts");
        touch(tmp.path(), "old.test.ts.bak");
        touch(tmp.path(), "helpers.ts");
        fs::create_dir(tmp.path().join("fixtures")).unwrap();

        let suites = Suites::scan(tmp.path(), ".test.ts", ".bak").unwrap();
        assert_eq!(
            suites.names().collect::<Vec<_>>(),
            vec!["autoPlay", "basicActions"]
        );
        assert_eq!(
            suites.get("autoPlay").unwrap(),
            &tmp.path().join("autoPlay.test.ts")
        );
        assert!(suites.get("old").is_none());
        assert!(suites.get("helpers").is_none());
    }

    #[test]
    fn test_all_paths_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "zoom.test.ts");
        touch(tmp.path(), "audio.test.ts");

        let suites = Suites::scan(tmp.path(), ".test.ts", ".bak").unwrap();
        assert_eq!(
            suites.all_paths(),
            vec![
                tmp.path().join("audio.test.ts"),
                tmp.path().join("zoom.test.ts")
            ]
        );
    }

    #[test]
    fn test_discover_falls_back_to_second_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let second = tmp.path().join("E2E/suites");
        fs::create_dir_all(&second).unwrap();
        touch(&second, "windowSize.test.ts");

        let config = SuitesConfig {
            dirs: vec![tmp.path().join("tests/E2E/suites"), second.clone()],
            ..SuitesConfig::default()
        };
        let suites = Suites::discover(&config).unwrap();
        assert_eq!(suites.names().count(), 1);
        assert_eq!(
            suites.get("windowSize").unwrap(),
            &second.join("windowSize.test.ts")
        );
    }

    #[test]
    fn test_empty_backup_marker_keeps_every_suite() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "autoPlay.test.ts");
        touch(tmp.path(), "zoom.test.ts.bak");

        let suites = Suites::scan(tmp.path(), ".test.ts", "").unwrap();
        assert_eq!(suites.names().collect::<Vec<_>>(), vec!["autoPlay", "zoom.bak"]);
    }

    #[test]
    fn test_discover_without_any_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = SuitesConfig {
            dirs: vec![tmp.path().join("missing")],
            ..SuitesConfig::default()
        };
        let err = Suites::discover(&config).unwrap_err();
        assert!(matches!(err, Error::SuitesDirNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }
}
