//! CLI command handling
//!
//! Loads configuration, discovers suites, parses argv and hands the result
//! to the runner.

pub mod args;

use crate::common::{Config, Result};
use crate::runner;
use crate::suites::Suites;

use args::{ParseOutcome, HELP};

/// Handle one invocation and return the process exit code
pub async fn dispatch<S: AsRef<str>>(argv: &[S]) -> Result<i32> {
    let config = Config::load()?;
    let suites = Suites::discover(&config.suites)?;

    match args::parse_from(argv, &suites)? {
        ParseOutcome::Help => {
            println!("{}", HELP);
            Ok(0)
        }
        ParseOutcome::Run(run) => {
            tracing::debug!(
                "Run config: browsers={} suites={} concurrency={} online={}",
                run.browsers,
                run.test_suites.len(),
                run.concurrency,
                run.online_mode
            );
            let report = runner::run(&run, &config).await?;
            Ok(report.exit_code())
        }
    }
}
