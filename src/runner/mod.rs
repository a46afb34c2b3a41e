//! TestCafe runner
//!
//! Hands a parsed run configuration to the TestCafe CLI as a child process
//! and turns its exit status into ours. TestCafe exits with the number of
//! failed tests, which the OS truncates to its low eight bits; in remote
//! runs the reporter summary we relay corrects for that.

mod command;
mod network;
mod remote;

use std::io::IsTerminal;
use std::process::{ExitStatus, Stdio};

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

use crate::browsers::DeviceFarm;
use crate::cli::args::RunConfig;
use crate::common::{Config, Error, Result};

pub use command::{Invocation, Launcher};
pub use network::local_ipv4;
pub use remote::{classify, parse_failed_summary, relay_line, rewrite_loopback, PairingEvent};

/// Outcome of a TestCafe run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Failed test count reported through TestCafe's exit status
    pub failed: i32,
}

impl RunReport {
    /// Combine the exit code with the failed count from the reporter summary
    ///
    /// An exit code of 0 is trusted only when no summary says otherwise,
    /// since 256 failures also exit with 0.
    pub fn from_exit(code: i32, summary: Option<u32>) -> Self {
        let failed = match summary {
            Some(n) if code == 0 && n > 0 => i32::try_from(n).unwrap_or(i32::MAX),
            _ => code,
        };
        Self { failed }
    }

    pub fn passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code: 0 when everything passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Run the configured suites and report the result
pub async fn run(run: &RunConfig, config: &Config) -> Result<RunReport> {
    println!("{}", "Preparing to run the tests".cyan());
    tracing::info!("Test suites: {}", run.test_suites.len());
    for suite in &run.test_suites {
        tracing::debug!("  {}", suite.display());
    }

    if run.online_mode {
        println!("{}", "Running online tests".cyan());
    } else {
        println!("{}", "Running local tests".cyan());
    }

    check_device_farms(run)?;

    let hostname = match &config.testcafe.hostname {
        Some(hostname) => hostname.clone(),
        None => local_ipv4().to_string(),
    };
    tracing::info!("My local IP is {}", hostname);

    let cwd = std::env::current_dir()?;
    let launcher = Launcher::resolve(&config.testcafe, &cwd)?;
    let invocation = Invocation::build(
        run,
        &config.testcafe,
        &config.timeouts,
        &hostname,
        std::io::stdout().is_terminal(),
    );

    let (program, prefix) = launcher.program();
    let mut cmd = TokioCommand::new(program);
    cmd.args(prefix).args(&invocation.args).kill_on_drop(true);
    tracing::debug!("Spawning {} {} {}", program.display(), prefix.join(" "), invocation.args.join(" "));

    let label = if run.browsers.is_remote() { "remote" } else { "local" };
    let (status, summary) = if run.browsers.is_remote() {
        run_remote(cmd, &hostname).await?
    } else {
        (run_local(cmd).await?, None)
    };

    let code = status.code().ok_or(Error::RunnerTerminated)?;
    let report = RunReport::from_exit(code, summary);

    if report.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            format!("All {} automated tests passed", label).green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            format!("Some {} automated tests failed", label).red().bold()
        );
        tracing::debug!("TestCafe reported {} failed test(s)", report.failed);
    }

    Ok(report)
}

/// Device-farm targets need online mode; warn about missing credentials
fn check_device_farms(run: &RunConfig) -> Result<()> {
    let farms = run.browsers.device_farms();

    if !run.online_mode {
        if let Some(farm) = farms.first() {
            return Err(Error::OnlineModeRequired {
                provider: farm.name().to_string(),
            });
        }
        return Ok(());
    }

    for farm in &farms {
        for var in missing_credentials(*farm) {
            tracing::warn!("{} is not set; {} may reject the session", var, farm.name());
        }
    }
    Ok(())
}

fn missing_credentials(farm: DeviceFarm) -> Vec<&'static str> {
    farm.credential_vars()
        .iter()
        .copied()
        .filter(|var| std::env::var_os(var).is_none())
        .collect()
}

async fn run_local(mut cmd: TokioCommand) -> Result<ExitStatus> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(Error::RunnerSpawn)
}

/// Relay TestCafe's output while it waits for a device to pair
///
/// There is no pairing timeout; TestCafe waits until a device connects.
/// Output is read as bytes so non-UTF-8 log lines are relayed lossily
/// instead of ending the run.
async fn run_remote(mut cmd: TokioCommand, hostname: &str) -> Result<(ExitStatus, Option<u32>)> {
    println!("{}", "Running remote tests. Connect to the URL".cyan());

    let mut child = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(Error::RunnerSpawn)?;

    let mut summary = None;
    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        let mut connected = false;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Stopped relaying TestCafe output: {}", e);
                    let _ = tokio::io::copy(&mut reader, &mut tokio::io::stdout()).await;
                    break;
                }
            }

            let raw = String::from_utf8_lossy(&buf);
            let raw = raw.trim_end_matches(['\n', '\r']);
            let (line, event) = relay_line(raw, hostname);
            match event {
                Some(PairingEvent::ConnectUrl(url)) => {
                    println!(
                        "{}",
                        "Open the following URL on a remote browser to run the tests, or scan the QR code:"
                            .yellow()
                    );
                    tracing::info!("Pairing URL: {}", url);
                }
                Some(PairingEvent::Connected) if !connected => {
                    connected = true;
                    tracing::info!("Remote browser connected, running tests");
                }
                _ => {}
            }
            if let Some(failed) = parse_failed_summary(&line) {
                summary = Some(failed);
            }
            println!("{}", line);
        }
    }

    let status = child.wait().await.map_err(Error::RunnerSpawn)?;
    Ok((status, summary))
}
