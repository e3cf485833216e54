//! Port traits defining external boundaries.
//!
//! The only boundary this crate crosses is the operating system's command
//! line. Implementations live in `src/adapters/`.

pub mod shell;

pub use shell::{ShellExecutor, ShellOutput};
