//! Argument parser for the e2e CLI.
//!
//! Options are handled strictly left to right and the first failing one
//! aborts parsing. The legacy multi-letter single-dash flags (`-a-b`,
//! `-a-t`, `-on`) are part of the interface, so this is a plain switch
//! rather than a declarative parser.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use thiserror::Error;

use crate::browsers::Browsers;
use crate::suites::Suites;

/// Argument validation errors, each with its own exit code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    // === Browsers (1x) ===
    #[error("Browsers are not defined")]
    BrowsersMissing,

    #[error("Cannot use remote with other browsers")]
    RemoteWithOthers,

    #[error("Browsers already defined")]
    BrowsersAlreadyDefined,

    #[error("No browser defined")]
    NoBrowsers,

    // === Tests (2x) ===
    #[error("Tests already defined")]
    TestsAlreadyDefined,

    #[error("Tests are not defined")]
    TestsMissing,

    #[error("No test defined")]
    NoTests,

    #[error("Tests not found: {}", .0.join(", "))]
    TestsNotFound(Vec<String>),

    #[error("Tests already defined")]
    AllTestsAlreadyDefined,

    // === Concurrency and mode (3x) ===
    #[error("Concurrency already defined")]
    ConcurrencyAlreadyDefined,

    #[error("Concurrency is not a number")]
    ConcurrencyNotANumber,

    #[error("Online mode already defined")]
    OnlineModeAlreadyDefined,

    #[error("Concurrency must be at least 1")]
    ConcurrencyZero,

    // === Unknown (4x) ===
    #[error("Option {0} does not exist")]
    UnknownOption(String),
}

impl ArgsError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ArgsError::BrowsersMissing => 10,
            ArgsError::RemoteWithOthers => 11,
            ArgsError::BrowsersAlreadyDefined => 12,
            ArgsError::NoBrowsers => 13,
            ArgsError::TestsAlreadyDefined => 20,
            ArgsError::TestsMissing => 21,
            ArgsError::NoTests => 22,
            ArgsError::TestsNotFound(_) => 23,
            ArgsError::AllTestsAlreadyDefined => 24,
            ArgsError::ConcurrencyAlreadyDefined => 30,
            ArgsError::ConcurrencyNotANumber => 31,
            ArgsError::OnlineModeAlreadyDefined => 32,
            ArgsError::ConcurrencyZero => 33,
            ArgsError::UnknownOption(_) => 40,
        }
    }
}

/// Configuration for one run, built once from argv
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub browsers: Browsers,
    pub test_suites: Vec<PathBuf>,
    pub concurrency: NonZeroUsize,
    pub online_mode: bool,
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Run(RunConfig),
    Help,
}

/// Parse arguments (without the program name) against discovered suites
pub fn parse_from<S: AsRef<str>>(args: &[S], suites: &Suites) -> Result<ParseOutcome, ArgsError> {
    let mut browsers: Option<Browsers> = None;
    let mut test_suites: Option<Vec<PathBuf>> = None;
    let mut concurrency: Option<NonZeroUsize> = None;
    let mut online_mode = false;

    let mut args = args.iter().map(|s| AsRef::<str>::as_ref(s));
    while let Some(param) = args.next() {
        match param {
            "-b" | "--browsers" => {
                if browsers.is_some() {
                    return Err(ArgsError::BrowsersAlreadyDefined);
                }
                let value = args.next().ok_or(ArgsError::BrowsersMissing)?;
                let resolved = Browsers::parse(value)?;
                tracing::debug!("Browsers defined: {}", resolved);
                browsers = Some(resolved);
            }

            "-a-b" | "--all-browsers" => {
                if browsers.is_some() {
                    return Err(ArgsError::BrowsersAlreadyDefined);
                }
                browsers = Some(Browsers::All);
            }

            "-t" | "--tests" => {
                if test_suites.is_some() {
                    return Err(ArgsError::TestsAlreadyDefined);
                }
                let value = args.next().ok_or(ArgsError::TestsMissing)?;
                test_suites = Some(resolve_suites(value, suites)?);
            }

            "-a-t" | "--all-tests" => {
                if test_suites.is_some() {
                    return Err(ArgsError::AllTestsAlreadyDefined);
                }
                test_suites = Some(suites.all_paths());
            }

            "-c" | "--concurrency" => {
                if concurrency.is_some() {
                    return Err(ArgsError::ConcurrencyAlreadyDefined);
                }
                let value = args.next().ok_or(ArgsError::ConcurrencyNotANumber)?;
                concurrency = Some(parse_concurrency(value)?);
            }

            "-on" | "--onlinemode" => {
                if online_mode {
                    return Err(ArgsError::OnlineModeAlreadyDefined);
                }
                online_mode = true;
            }

            "-h" | "--help" => return Ok(ParseOutcome::Help),

            other => return Err(ArgsError::UnknownOption(other.to_string())),
        }
    }

    Ok(ParseOutcome::Run(RunConfig {
        browsers: browsers.unwrap_or(Browsers::All),
        test_suites: test_suites.unwrap_or_else(|| suites.all_paths()),
        concurrency: concurrency.unwrap_or(NonZeroUsize::MIN),
        online_mode,
    }))
}

/// Resolve whitespace-separated suite names, reporting every unknown one
fn resolve_suites(value: &str, suites: &Suites) -> Result<Vec<PathBuf>, ArgsError> {
    let names: Vec<&str> = value.split_whitespace().collect();
    if names.is_empty() {
        return Err(ArgsError::NoTests);
    }

    let mut found = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match suites.get(name) {
            Some(path) => found.push(path.clone()),
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(ArgsError::TestsNotFound(missing));
    }
    Ok(found)
}

fn parse_concurrency(value: &str) -> Result<NonZeroUsize, ArgsError> {
    let n: usize = value
        .trim()
        .parse()
        .map_err(|_| ArgsError::ConcurrencyNotANumber)?;
    NonZeroUsize::new(n).ok_or(ArgsError::ConcurrencyZero)
}

/// Usage text printed by `-h/--help`
pub const HELP: &str = r#"e2e - Run the automated E2E tests with TestCafe

USAGE:
    e2e [OPTION]...

DESCRIPTION:
    Run the automated E2E tests in one or more browsers with TestCafe.
    Runs every suite or just a few of them, optionally in parallel.

OPTIONS:
    -b, --browsers <BROWSERS>
        Browsers to run the tests on, separated by spaces inside one
        string. Example: "chrome firefox".
        "remote" prints a URL and QR code to open on another device and
        cannot be combined with other browsers.
        Presets: browserstack:mobile, browserstack:desktop,
        browserstack:ios, browserstack:android, lambdatest.
        A single "browserstack:<device>@<version>[:<os>]" is kept whole.

    -a-b, --all-browsers
        Run on all local browsers. Default when no browsers are given.

    -t, --tests <SUITES>
        Suites to run, separated by spaces inside one string.
        Example: "basicActions windowSize".

    -a-t, --all-tests
        Run every suite. Default when no suites are given.

    -c, --concurrency <N>
        Number of browser instances running tests in parallel. Default: 1.

    -on, --onlinemode
        Enable online mode, required for BrowserStack and LambdaTest.

    -h, --help
        Show this help message.

EXAMPLES:
    e2e -a-b -a-t
    e2e -a-b -a-t -c 3
    e2e -b "chrome firefox" -t "basicActions windowSize" -c 3
    e2e -b remote -t basicActions
    e2e -on -b browserstack:mobile

EXIT STATUS:
    0       all tests passed, or help was shown
    1       some tests failed, or TestCafe could not run
    2       device-farm browsers without online mode
    3       no suites directory
    10-13   invalid browsers
    20-24   invalid tests
    30-33   invalid concurrency or online mode
    40      unknown option

CONFIGURATION:
    Optional TOML file at ~/.config/e2e-cli/config.toml (Linux).
    Set RUST_LOG=e2e=debug for diagnostics.
"#;
