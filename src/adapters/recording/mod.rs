//! Recording adapters that capture interactions to cassettes.

pub mod shell;

pub use shell::RecordingShellExecutor;
