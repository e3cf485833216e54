//! Thin wrappers over Linux administration tools.
//!
//! Every wrapper formats one command line, runs it through the
//! [`exec`] facade (via the [`ports::ShellExecutor`] held by a
//! [`context::ServiceContext`]) and parses the plaintext output into a typed
//! result. Absent resources and failed commands come back as `None` or
//! `false`, never as an error.

pub mod account;
pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod colorlog;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod filesystem;
pub mod firewall;
pub mod logging;
pub mod network;
pub mod packages;
pub mod ports;
pub mod process;
pub mod service;
pub mod system;

#[cfg(test)]
mod testing;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::Config;

/// Run the CLI with the provided arguments.
///
/// Returns `Ok(true)` when the operation succeeded or found what it looked
/// for, and `Ok(false)` when it reported `false` or an absent result.
///
/// # Errors
///
/// Returns an error string when argument parsing fails, the configuration is
/// inconsistent, or command execution fails.
pub fn run<I, T>(args: I) -> Result<bool, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return Ok(true);
        }
        Err(err) => return Err(err.to_string()),
    };
    let config = Config::load(&cli.overrides()).map_err(|err| err.to_string())?;
    logging::init(&config.log_filter);
    commands::dispatch(&cli.command, &config)
}
