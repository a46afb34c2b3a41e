//! Error types for the e2e CLI
//!
//! Every error maps to a stable process exit code so that scripts driving
//! the harness can tell failures apart without parsing messages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::args::ArgsError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the e2e CLI
#[derive(Error, Debug)]
pub enum Error {
    // === Argument Errors ===
    #[error("{0}")]
    Args(#[from] ArgsError),

    // === Suite Errors ===
    #[error("No suites directory found. Searched: {searched}")]
    SuitesDirNotFound { searched: String },

    #[error("Failed to read suites directory '{}': {source}", .path.display())]
    SuitesDirRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Browser Errors ===
    #[error("You need to enable the online mode (-on) to run tests on {provider}")]
    OnlineModeRequired { provider: String },

    // === Runner Errors ===
    #[error("TestCafe not found. Install it with 'npm install -g testcafe' or set [testcafe].command in the config file")]
    TestCafeNotFound,

    #[error("Failed to start TestCafe: {0}")]
    RunnerSpawn(#[source] io::Error),

    #[error("TestCafe terminated without an exit status")]
    RunnerTerminated,

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Args(e) => e.exit_code(),
            Error::OnlineModeRequired { .. } => 2,
            Error::SuitesDirNotFound { .. } | Error::SuitesDirRead { .. } => 3,
            _ => 1,
        }
    }

    /// Create a suites-directory-not-found error listing the searched paths
    pub fn suites_dir_not_found<P: AsRef<std::path::Path>>(paths: &[P]) -> Self {
        Self::SuitesDirNotFound {
            searched: paths
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
