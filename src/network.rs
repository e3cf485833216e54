//! NetworkManager connection handling through `nmcli`.
//!
//! Connections are addressed by id, so interface-based operations first
//! resolve the interface's active connection.

use crate::context::ServiceContext;
use crate::exec::Invocation;

const ZONE_FIELD: &str = "connection.zone";

/// Id of the connection active on interface `ifc`.
#[must_use]
pub fn connection_id(ctx: &ServiceContext, ifc: &str) -> Option<String> {
    let output = ctx.execute_privileged(Invocation::new(format!(
        "nmcli -g GENERAL.CONNECTION device show {ifc}"
    )))?;
    output.success().then(|| output.stdout.trim_end_matches('\n').to_string())
}

/// Firewall zone assigned to the connection on interface `ifc`.
#[must_use]
pub fn interface_zone(ctx: &ServiceContext, ifc: &str) -> Option<String> {
    let id = connection_id(ctx, ifc)?;
    let output = ctx.execute_privileged(Invocation::shell(format!(
        "nmcli connection show '{id}' | grep {ZONE_FIELD}"
    )))?;
    if !output.success() {
        return None;
    }
    parse_zone(&output.stdout)
}

/// Activates connection `conn`.
#[must_use]
pub fn up(ctx: &ServiceContext, conn: &str) -> bool {
    succeeded(ctx, Invocation::shell(format!("nmcli connection up '{conn}'")))
}

/// Deactivates the connection on interface `ifc`.
///
/// Only connections named after their interface are taken down, which keeps
/// the primary connection (usually named differently) up.
#[must_use]
pub fn down(ctx: &ServiceContext, ifc: &str) -> bool {
    match connection_id(ctx, ifc) {
        Some(id) if id == ifc => {
            succeeded(ctx, Invocation::shell(format!("nmcli connection down '{id}'")))
        }
        _ => false,
    }
}

/// Re-reads connection profiles from disk.
#[must_use]
pub fn reload_connections(ctx: &ServiceContext) -> bool {
    succeeded(ctx, Invocation::new("nmcli connection reload"))
}

/// Assigns the connection on interface `ifc` to firewall zone `zone`.
#[must_use]
pub fn set_interface_zone(ctx: &ServiceContext, ifc: &str, zone: &str) -> bool {
    let Some(id) = connection_id(ctx, ifc) else {
        return false;
    };
    succeeded(
        ctx,
        Invocation::shell(format!("nmcli connection modify '{id}' {ZONE_FIELD} {zone}")),
    )
}

/// Value after `connection.zone:` in `nmcli connection show` output.
///
/// An unset zone prints as `--`, which is returned as is.
#[must_use]
pub fn parse_zone(stdout: &str) -> Option<String> {
    stdout
        .split(&format!("{ZONE_FIELD}:"))
        .nth(1)
        .map(|value| value.trim_matches(|c: char| c == ' ' || c == '\n').to_string())
}

fn succeeded(ctx: &ServiceContext, invocation: Invocation) -> bool {
    ctx.execute_privileged(invocation).is_some_and(|output| output.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{out, replay, replay_privileged};

    #[test]
    fn zone_value_trimmed() {
        assert_eq!(parse_zone("connection.zone:                        public\n"), Some("public".into()));
        assert_eq!(parse_zone("connection.zone:                        --\n"), Some("--".into()));
        assert_eq!(parse_zone("connection.id: eth0\n"), None);
    }

    #[test]
    fn interface_zone_resolves_connection_first() {
        let (ctx, shell) = replay(vec![
            out(0, "System eth0\n", ""),
            out(0, "connection.zone:                        internal\n", ""),
        ]);
        assert_eq!(interface_zone(&ctx, "eth0"), Some("internal".into()));
        assert_eq!(
            shell.issued(),
            vec![
                "nmcli -g GENERAL.CONNECTION device show eth0",
                "nmcli connection show 'System eth0' | grep connection.zone",
            ]
        );
    }

    #[test]
    fn unknown_device_has_no_connection() {
        let (ctx, shell) = replay(vec![out(10, "", "Error: Device 'eth9' not found.\n")]);
        assert_eq!(interface_zone(&ctx, "eth9"), None);
        assert_eq!(shell.remaining(), 0);
    }

    #[test]
    fn down_refuses_connections_named_differently() {
        let (ctx, shell) = replay(vec![out(0, "System eth0\n", "")]);
        assert!(!down(&ctx, "eth0"));
        assert_eq!(shell.issued().len(), 1);
    }

    #[test]
    fn down_matching_connection() {
        let (ctx, shell) = replay_privileged(vec![out(0, "eth1\n", ""), out(0, "", "")]);
        assert!(down(&ctx, "eth1"));
        assert_eq!(shell.issued()[1], "echo *** | sudo -S nmcli connection down 'eth1'");
    }

    #[test]
    fn set_zone_modifies_connection() {
        let (ctx, shell) = replay(vec![out(0, "Wired connection 1\n", ""), out(0, "", "")]);
        assert!(set_interface_zone(&ctx, "ens3", "trusted"));
        assert_eq!(
            shell.issued()[1],
            "nmcli connection modify 'Wired connection 1' connection.zone trusted"
        );
    }

    #[test]
    fn up_and_reload() {
        let (ctx, shell) = replay(vec![out(0, "", ""), out(0, "", "")]);
        assert!(up(&ctx, "eth1"));
        assert!(reload_connections(&ctx));
        assert_eq!(shell.issued(), vec!["nmcli connection up 'eth1'", "nmcli connection reload"]);
    }
}
