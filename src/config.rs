//! Runtime configuration.
//!
//! Values are resolved in this order, first match wins:
//!
//! 1. command-line flags ([`Overrides`])
//! 2. process environment
//! 3. a `.env` file in the working directory (loaded with `dotenvy`)
//! 4. built-in defaults

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::exec::EscalationSecret;

/// Environment variable holding the escalation secret.
pub const ENV_SUDO_PASSWORD: &str = "LINUX_CMD_SUDO_PASSWORD";
/// Environment variable naming a directory to record cassettes into.
pub const ENV_RECORD: &str = "LINUX_CMD_RECORD";
/// Environment variable naming a cassette to replay.
pub const ENV_REPLAY: &str = "LINUX_CMD_REPLAY";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Escalation secret passed with `--sudo-password`.
    pub sudo_password: Option<String>,
    /// Record directory passed with `--record`.
    pub record: Option<PathBuf>,
    /// Cassette passed with `--replay`.
    pub replay: Option<PathBuf>,
    /// Number of `-v` flags.
    pub verbose: u8,
}

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Secret piped into `sudo -S` for privileged operations.
    pub escalation: Option<EscalationSecret>,
    /// Directory to record shell interactions into.
    pub record_dir: Option<PathBuf>,
    /// Cassette to replay shell interactions from.
    pub replay_cassette: Option<PathBuf>,
    /// Default log filter, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Config {
    /// Loads `.env` (if present) and resolves configuration from the real
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved values are inconsistent.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        // A missing .env file is the common case.
        let _ = dotenvy::dotenv();
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration from overrides and an environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RecordAndReplay`] when both a record directory
    /// and a replay cassette are configured, and
    /// [`ConfigError::EmptyVariable`] when the secret variable is empty.
    pub fn resolve(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let sudo_password = match overrides.sudo_password.clone() {
            Some(password) => Some(password),
            None => match lookup(ENV_SUDO_PASSWORD) {
                Some(password) if password.is_empty() => {
                    return Err(ConfigError::EmptyVariable(ENV_SUDO_PASSWORD))
                }
                other => other,
            },
        };
        let record_dir =
            overrides.record.clone().or_else(|| lookup(ENV_RECORD).map(PathBuf::from));
        let replay_cassette =
            overrides.replay.clone().or_else(|| lookup(ENV_REPLAY).map(PathBuf::from));

        if let (Some(record), Some(replay)) = (&record_dir, &replay_cassette) {
            return Err(ConfigError::RecordAndReplay {
                record: record.display().to_string(),
                replay: replay.display().to_string(),
            });
        }

        Ok(Self {
            escalation: sudo_password.map(EscalationSecret::new),
            record_dir,
            replay_cassette,
            log_filter: log_filter(overrides.verbose).to_string(),
        })
    }
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
