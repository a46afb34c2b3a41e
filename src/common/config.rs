//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where suites live and how they are named
    #[serde(default)]
    pub suites: SuitesConfig,

    /// TestCafe invocation settings
    #[serde(default)]
    pub testcafe: TestCafeConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Suite discovery settings
#[derive(Debug, Deserialize, Clone)]
pub struct SuitesConfig {
    /// Candidate directories, first existing one wins
    #[serde(default = "default_suite_dirs")]
    pub dirs: Vec<PathBuf>,

    /// File name fragment that marks a suite file
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// File name fragment that marks a backup to skip
    #[serde(default = "default_backup_marker")]
    pub backup_marker: String,
}

impl Default for SuitesConfig {
    fn default() -> Self {
        Self {
            dirs: default_suite_dirs(),
            suffix: default_suffix(),
            backup_marker: default_backup_marker(),
        }
    }
}

fn default_suite_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("tests/E2E/suites"), PathBuf::from("E2E/suites")]
}

fn default_suffix() -> String {
    ".test.ts".to_string()
}

fn default_backup_marker() -> String {
    ".bak".to_string()
}

/// TestCafe invocation settings
#[derive(Debug, Deserialize, Clone)]
pub struct TestCafeConfig {
    /// Path to the testcafe executable (searched in PATH when unset)
    pub command: Option<PathBuf>,

    /// Additional arguments appended to every invocation
    #[serde(default)]
    pub args: Vec<String>,

    /// Hostname advertised to browsers (LAN address when unset)
    pub hostname: Option<String>,

    /// Proxy ports
    #[serde(default = "default_ports")]
    pub ports: [u16; 2],
}

impl Default for TestCafeConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            hostname: None,
            ports: default_ports(),
        }
    }
}

fn default_ports() -> [u16; 2] {
    [12345, 12346]
}

/// Timeout settings in milliseconds
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Time an assertion may retry before failing
    #[serde(default = "default_assertion")]
    pub assertion_ms: u64,

    /// Time a single test may run
    #[serde(default = "default_test_execution")]
    pub test_execution_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            assertion_ms: default_assertion(),
            test_execution_ms: default_test_execution(),
        }
    }
}

fn default_assertion() -> u64 {
    60_000
}
fn default_test_execution() -> u64 {
    180_000
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return Self::from_toml(&content);
            }
        }
        Ok(Self::default())
    }

    /// Parse configuration from TOML text
    ///
    /// An empty suite suffix would make every file a suite, so it is
    /// rejected. An empty backup marker disables backup filtering.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        if config.suites.suffix.is_empty() {
            return Err(super::Error::ConfigParse(
                "[suites].suffix must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
