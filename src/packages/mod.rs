//! Package managers: `dnf` and `rpm` on RHEL-family hosts, `apt-get` and
//! `dpkg` on Debian-family hosts.
//!
//! Each tool is a module of free functions. [`PackageManager`] puts the
//! operations they share behind one trait so callers can pick a tool at
//! runtime.

pub mod apt;
pub mod dnf;
pub mod dpkg;
pub mod rpm;

use clap::ValueEnum;

use crate::context::ServiceContext;

pub use apt::Apt;
pub use dnf::Dnf;
pub use dpkg::Dpkg;
pub use rpm::Rpm;

/// Operations every supported package tool provides.
///
/// For `dnf` and `apt-get` the target is a repository package name; for
/// `rpm` and `dpkg` it is a local package file on install and an installed
/// package name otherwise.
pub trait PackageManager: Send + Sync {
    /// Tool name, as invoked.
    fn name(&self) -> &'static str;

    /// Installs `target`.
    fn install(&self, ctx: &ServiceContext, target: &str) -> bool;

    /// Whether a package matching `name` is installed.
    fn is_installed(&self, ctx: &ServiceContext, name: &str) -> bool;

    /// Removes `name`.
    fn uninstall(&self, ctx: &ServiceContext, name: &str) -> bool;

    /// Refreshes the repository index. `None` for tools without one.
    fn update(&self, _ctx: &ServiceContext) -> Option<bool> {
        None
    }

    /// Whether the tool can map installed files back to packages.
    fn tracks_files(&self) -> bool {
        false
    }

    /// Package that ships the executable `command`. `None` when nothing
    /// owns it, or the tool does not track files.
    fn owning_package(&self, _ctx: &ServiceContext, _command: &str) -> Option<String> {
        None
    }
}

/// Selects a [`PackageManager`] by tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ManagerKind {
    /// `dnf`
    Dnf,
    /// `rpm`
    Rpm,
    /// `apt-get`
    Apt,
    /// `dpkg`
    Dpkg,
}

impl ManagerKind {
    /// The manager implementing this tool.
    #[must_use]
    pub fn manager(self) -> &'static dyn PackageManager {
        match self {
            Self::Dnf => &Dnf,
            Self::Rpm => &Rpm,
            Self::Apt => &Apt,
            Self::Dpkg => &Dpkg,
        }
    }
}
