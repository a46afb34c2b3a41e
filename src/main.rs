//! E2E CLI - runs TestCafe end-to-end UI suites
//!
//! Every outcome ends in a single `process::exit` with a stable code.

use colored::Colorize;
use e2e::{cli, common::logging};

#[tokio::main]
async fn main() {
    logging::init_cli();

    // Lossy so a non-UTF-8 argument reaches the parser and gets its exit code
    let argv: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let code = match cli::dispatch(argv.as_slice()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            e.exit_code()
        }
    };

    std::process::exit(code);
}
