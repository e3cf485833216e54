//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::colorlog::Color;
use crate::config::Overrides;
use crate::firewall::{Action, ObjectType, RuleAction};
use crate::packages::ManagerKind;

/// Top-level CLI parser for `linux-cmd`.
#[derive(Debug, Parser)]
#[command(name = "linux-cmd", version, about = "Run Linux administration tools and parse their output")]
pub struct Cli {
    /// Password piped into `sudo -S` for privileged operations.
    #[arg(long, global = true, value_name = "PASSWORD")]
    pub sudo_password: Option<String>,
    /// Record every command and its output into a cassette under DIR.
    #[arg(long, global = true, value_name = "DIR")]
    pub record: Option<PathBuf>,
    /// Replay command output from a cassette instead of running anything.
    #[arg(long, global = true, value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Configuration values given on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            sudo_password: self.sudo_password.clone(),
            record: self.record.clone(),
            replay: self.replay.clone(),
            verbose: self.verbose,
        }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query and change firewalld zones and rules.
    #[command(subcommand)]
    Firewall(FirewallCommand),
    /// Control systemd services.
    #[command(subcommand)]
    Service(ServiceCommand),
    /// Install, query and remove packages.
    Pkg {
        /// Package tool to drive.
        #[arg(long, value_enum)]
        manager: ManagerKind,
        /// Package operation.
        #[command(subcommand)]
        command: PkgCommand,
    },
    /// Manage NetworkManager connections.
    #[command(subcommand)]
    Net(NetCommand),
    /// Inspect and modify files.
    #[command(subcommand)]
    Fs(FsCommand),
    /// Query the invoking account.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Show `ps` lines mentioning a process id.
    Ps {
        /// Process id to look for.
        pid: u32,
    },
    /// Query environment, distribution and addresses.
    #[command(subcommand)]
    Sys(SysCommand),
    /// Print text with `<highlighted>` spans in color.
    Print {
        /// Text to print.
        text: String,
        /// Highlight color.
        #[arg(long, value_enum, default_value = "white")]
        color: Color,
        /// Do not print a trailing newline.
        #[arg(short = 'n', long)]
        no_newline: bool,
    },
}

/// `firewall` subcommands.
#[derive(Debug, Subcommand)]
pub enum FirewallCommand {
    /// Whether firewalld is running.
    State,
    /// Zones with an interface or source bound.
    ActiveZones,
    /// All known zones.
    Zones,
    /// The default zone.
    DefaultZone,
    /// Interfaces bound to a zone.
    ZoneInterfaces {
        /// Zone name.
        zone: String,
    },
    /// Add or remove a rich rule.
    RichRule(RichRuleArgs),
    /// Add or remove a port, service, interface, protocol or source.
    Object {
        /// `add` or `remove`.
        #[arg(value_enum)]
        action: Action,
        /// Kind of object.
        #[arg(value_enum)]
        object_type: ObjectType,
        /// Object value, e.g. `443/tcp` or `eth1`.
        value: String,
        /// Target zone.
        #[arg(long)]
        zone: Option<String>,
        /// Change the permanent configuration and reload.
        #[arg(long)]
        permanent: bool,
    },
    /// Change the default zone.
    SetDefaultZone {
        /// Zone name.
        zone: String,
    },
    /// Reload the permanent configuration.
    Reload,
}

/// Arguments of `firewall rich-rule`.
#[derive(Debug, Args)]
pub struct RichRuleArgs {
    /// `add` or `remove`.
    #[arg(value_enum)]
    pub action: Action,
    /// Verdict for matching traffic.
    #[arg(long, value_enum, default_value = "accept")]
    pub verdict: RuleAction,
    /// Address family.
    #[arg(long, default_value = "ipv4")]
    pub family: String,
    /// Target zone.
    #[arg(long)]
    pub zone: Option<String>,
    /// Change the permanent configuration and reload.
    #[arg(long)]
    pub permanent: bool,
    /// Source address match.
    #[arg(long)]
    pub source: Option<String>,
    /// Destination address match.
    #[arg(long)]
    pub destination: Option<String>,
    /// Service name match.
    #[arg(long)]
    pub service: Option<String>,
    /// Port match as `<port-or-range>/<protocol>`.
    #[arg(long)]
    pub port: Option<String>,
    /// Protocol name match.
    #[arg(long)]
    pub protocol: Option<String>,
}

/// `service` subcommands. Each takes a unit name.
#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// Whether the unit starts at boot.
    IsEnabled {
        /// Unit name.
        service: String,
    },
    /// Whether the unit is active.
    IsRunning {
        /// Unit name.
        service: String,
    },
    /// Enable the unit at boot.
    Enable {
        /// Unit name.
        service: String,
    },
    /// Disable the unit at boot.
    Disable {
        /// Unit name.
        service: String,
    },
    /// Start the unit.
    Start {
        /// Unit name.
        service: String,
    },
    /// Stop the unit.
    Stop {
        /// Unit name.
        service: String,
    },
    /// Restart the unit.
    Restart {
        /// Unit name.
        service: String,
    },
}

/// `pkg` subcommands.
#[derive(Debug, Subcommand)]
pub enum PkgCommand {
    /// Install a package (a file path for rpm and dpkg).
    Install {
        /// Package name or file.
        target: String,
    },
    /// Whether a matching package is installed.
    IsInstalled {
        /// Package name.
        name: String,
    },
    /// Remove a package.
    Uninstall {
        /// Package name.
        name: String,
    },
    /// Refresh the package index (dnf and apt only).
    Update,
    /// Package that ships an executable (rpm and dpkg only).
    Owner {
        /// Executable name.
        command: String,
    },
}

/// `net` subcommands.
#[derive(Debug, Subcommand)]
pub enum NetCommand {
    /// Connection active on an interface.
    ConnectionId {
        /// Interface name.
        ifc: String,
    },
    /// Firewall zone of an interface's connection.
    Zone {
        /// Interface name.
        ifc: String,
    },
    /// Activate a connection.
    Up {
        /// Connection id.
        connection: String,
    },
    /// Deactivate the connection on an interface.
    Down {
        /// Interface name.
        ifc: String,
    },
    /// Re-read connection profiles.
    Reload,
    /// Assign an interface's connection to a firewall zone.
    SetZone {
        /// Interface name.
        ifc: String,
        /// Zone name.
        zone: String,
    },
}

/// `fs` subcommands.
#[derive(Debug, Subcommand)]
pub enum FsCommand {
    /// Create a symbolic link.
    Symlink {
        /// Link target.
        target: String,
        /// Link path.
        link: String,
    },
    /// Whether a path exists.
    Exists {
        /// Path to check.
        path: String,
    },
    /// Kind of entry at a path.
    Type {
        /// Path to inspect.
        path: String,
    },
    /// Print a regular file.
    Cat {
        /// File path.
        path: String,
    },
    /// List a directory.
    Ls {
        /// Directory path.
        path: String,
    },
    /// Find paths by name.
    Find {
        /// Name pattern.
        name: String,
        /// Directory to search.
        #[arg(long, default_value = "/")]
        root: String,
    },
    /// Overwrite a file with one line.
    Write {
        /// File path.
        path: String,
        /// Line to write.
        contents: String,
    },
    /// Extract a tarball.
    Untar {
        /// Tarball path.
        tarball: String,
        /// Destination directory; defaults to the tarball's directory.
        #[arg(long)]
        dest: Option<String>,
    },
    /// Create a tarball.
    Tar {
        /// Archive path; `.tar` is appended if missing.
        #[arg(long)]
        save_as: String,
        /// Files to pack.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Download a URL quietly.
    Wget {
        /// URL to fetch.
        url: String,
        /// Destination directory.
        #[arg(long)]
        dest: Option<String>,
    },
}

/// `account` subcommands.
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Name of the invoking user.
    Whoami,
    /// Home directory of the invoking user.
    Home,
    /// Whether the user is root or can use sudo.
    IsSudoer,
    /// Whether a local account exists.
    Exists {
        /// Account name.
        username: String,
    },
}

/// `sys` subcommands.
#[derive(Debug, Subcommand)]
pub enum SysCommand {
    /// One environment variable, or all of them.
    Env {
        /// Variable name; omit to list everything.
        name: Option<String>,
    },
    /// Distribution pretty name.
    Distro,
    /// IPv4 address of an interface.
    Ipv4 {
        /// Interface name.
        ifc: String,
    },
}
