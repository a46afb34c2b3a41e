//! E2E CLI - a command-line harness for TestCafe UI suites
//!
//! Parses the harness flags, discovers suites, resolves browser targets
//! and runs TestCafe, mapping every failure to a stable exit code.

pub mod browsers;
pub mod cli;
pub mod common;
pub mod runner;
pub mod suites;

// Re-export commonly used types for tests
pub use browsers::Browsers;
pub use cli::args::{parse_from, ArgsError, ParseOutcome, RunConfig};
pub use common::{Error, Result};
pub use suites::Suites;
