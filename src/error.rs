//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the command execution facade.
///
/// A nonzero exit status is never an error; it is reported through
/// [`ShellOutput::exit_code`](crate::ports::ShellOutput::exit_code).
#[derive(Error, Debug)]
pub enum ExecError {
    /// The child process could not be started (missing executable, permissions).
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        /// Program that was being launched.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Waiting on or reading from the child process failed.
    #[error("failed to wait for child process: {0}")]
    Wait(#[source] io::Error),

    /// A replayed interaction recorded a launch failure.
    #[error("replayed failure: {0}")]
    Replay(String),
}

/// Failures while reading or writing cassette files.
#[derive(Error, Debug)]
pub enum CassetteError {
    /// The cassette file could not be read or written.
    #[error("cassette I/O on {path}: {source}")]
    Io {
        /// Cassette path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The cassette file is not valid YAML for the cassette schema.
    #[error("failed to parse cassette {path}: {source}")]
    Parse {
        /// Cassette path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The cassette could not be serialized.
    #[error("failed to serialize cassette: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Invalid runtime configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Recording and replaying were both requested.
    #[error("cannot record and replay in the same run (record: {record}, replay: {replay})")]
    RecordAndReplay {
        /// Requested record directory.
        record: String,
        /// Requested replay cassette.
        replay: String,
    },

    /// An environment variable held an empty value where a value is required.
    #[error("environment variable {0} is set but empty")]
    EmptyVariable(&'static str),
}
