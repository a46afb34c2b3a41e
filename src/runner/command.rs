//! TestCafe command line construction

use std::path::{Path, PathBuf};

use crate::cli::args::RunConfig;
use crate::common::config::{TestCafeConfig, Timeouts};
use crate::common::{Error, Result};

/// Project-local install location relative to the working directory
const LOCAL_BIN: &str = "node_modules/.bin/testcafe";

/// How TestCafe gets started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// A testcafe executable
    Direct(PathBuf),
    /// `npx testcafe`, for projects without a resolvable binary
    Npx(PathBuf),
}

impl Launcher {
    /// Find TestCafe: config, project-local install, PATH, then npx
    pub fn resolve(config: &TestCafeConfig, cwd: &Path) -> Result<Self> {
        if let Some(command) = &config.command {
            return Ok(Launcher::Direct(command.clone()));
        }

        let local = cwd.join(LOCAL_BIN);
        if local.is_file() {
            return Ok(Launcher::Direct(local));
        }

        if let Ok(path) = which::which("testcafe") {
            return Ok(Launcher::Direct(path));
        }

        which::which("npx")
            .map(Launcher::Npx)
            .map_err(|_| Error::TestCafeNotFound)
    }

    /// Program to spawn and the arguments that precede TestCafe's own
    pub fn program(&self) -> (&Path, &'static [&'static str]) {
        match self {
            Launcher::Direct(path) => (path.as_path(), &[]),
            Launcher::Npx(path) => (path.as_path(), &["testcafe"]),
        }
    }
}

/// Arguments for one TestCafe invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub args: Vec<String>,
}

impl Invocation {
    /// Build TestCafe's arguments for a run
    ///
    /// Remote runs get a QR code and no timeouts or concurrency, since a
    /// single paired device executes them.
    pub fn build(
        run: &RunConfig,
        testcafe: &TestCafeConfig,
        timeouts: &Timeouts,
        hostname: &str,
        color: bool,
    ) -> Self {
        let mut args = vec![run.browsers.to_testcafe_arg()];
        args.extend(run.test_suites.iter().map(|p| p.display().to_string()));

        args.push("--hostname".to_string());
        args.push(hostname.to_string());
        args.push("--ports".to_string());
        args.push(format!("{},{}", testcafe.ports[0], testcafe.ports[1]));

        if run.browsers.is_remote() {
            args.push("--qr-code".to_string());
        } else {
            args.push("--concurrency".to_string());
            args.push(run.concurrency.to_string());
            args.push("--assertion-timeout".to_string());
            args.push(timeouts.assertion_ms.to_string());
            args.push("--test-execution-timeout".to_string());
            args.push(timeouts.test_execution_ms.to_string());
        }

        if color {
            args.push("--color".to_string());
        }

        args.extend(testcafe.args.iter().cloned());
        Self { args }
    }
}
