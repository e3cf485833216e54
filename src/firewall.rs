//! firewalld management through `firewall-cmd`.
//!
//! Zone queries parse `firewall-cmd` plaintext output. Rule changes either
//! build a rich-rule expression or toggle a single object (port, service,
//! interface, ...) in a zone. Permanent changes are followed by a reload so
//! they also take effect in the runtime configuration.

use std::fmt;

use clap::ValueEnum;

use crate::colorlog::{eprint_colorlog, Color};
use crate::context::ServiceContext;
use crate::exec::Invocation;
use crate::network;
use crate::system;

/// Distribution whose `firewall-cmd` cannot bind interfaces permanently;
/// NetworkManager owns the zone assignment there.
const NMCLI_ZONE_DISTRIBUTION: &str = "CentOS Stream 8";

/// Whether a rule is being added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// `--add-*`
    Add,
    /// `--remove-*`
    Remove,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
        })
    }
}

/// Verdict of a rich rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RuleAction {
    /// Let matching traffic through.
    #[default]
    Accept,
    /// Refuse with an ICMP reply.
    Reject,
    /// Silently discard.
    Drop,
    /// Mark packets.
    Mark,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Drop => "drop",
            Self::Mark => "mark",
        })
    }
}

/// Kind of object toggled by [`rule_object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ObjectType {
    /// Network interface bound to the zone.
    Interface,
    /// `<port-or-range>/<protocol>`.
    Port,
    /// IP protocol name.
    Protocol,
    /// Predefined firewalld service.
    Service,
    /// Source address or network.
    Source,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interface => "interface",
            Self::Port => "port",
            Self::Protocol => "protocol",
            Self::Service => "service",
            Self::Source => "source",
        })
    }
}

/// A firewalld rich rule and where to apply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichRule {
    /// Verdict for matching traffic.
    pub action: RuleAction,
    /// Address family, `ipv4` or `ipv6`.
    pub family: String,
    /// Target zone; the default zone when `None`.
    pub zone: Option<String>,
    /// Apply to the permanent configuration.
    pub permanent: bool,
    /// Source address match.
    pub source: Option<String>,
    /// Destination address match.
    pub destination: Option<String>,
    /// Service name match.
    pub service: Option<String>,
    /// Port match as `<port-or-range>/<protocol>`.
    pub port: Option<String>,
    /// Protocol name match.
    pub protocol: Option<String>,
}

impl Default for RichRule {
    fn default() -> Self {
        Self {
            action: RuleAction::default(),
            family: "ipv4".into(),
            zone: None,
            permanent: false,
            source: None,
            destination: None,
            service: None,
            port: None,
            protocol: None,
        }
    }
}

/// Whether the firewalld daemon is running.
#[must_use]
pub fn is_running(ctx: &ServiceContext) -> bool {
    let Some(output) = ctx.execute_privileged(Invocation::new("firewall-cmd --state")) else {
        return false;
    };
    if output.success() && output.stdout == "running\n" {
        return true;
    }
    report(&output.stderr);
    false
}

/// Zones that currently have an interface or source bound.
#[must_use]
pub fn active_zone_names(ctx: &ServiceContext) -> Option<Vec<String>> {
    query(ctx, "firewall-cmd --get-active-zones").map(|stdout| parse_active_zones(&stdout))
}

/// Every zone firewalld knows about.
#[must_use]
pub fn all_zones(ctx: &ServiceContext) -> Option<Vec<String>> {
    query(ctx, "firewall-cmd --get-zones").map(|stdout| parse_zone_list(&stdout))
}

/// The zone used for interfaces without an explicit assignment.
#[must_use]
pub fn default_zone(ctx: &ServiceContext) -> Option<String> {
    query(ctx, "firewall-cmd --get-default-zone")
        .map(|stdout| stdout.trim_end_matches('\n').to_string())
}

/// Interfaces bound to `zone`.
#[must_use]
pub fn zone_interfaces(ctx: &ServiceContext, zone: &str) -> Option<Vec<String>> {
    let output = ctx.execute_privileged(Invocation::shell(format!(
        "firewall-cmd --list-all --zone={zone} | grep interface"
    )))?;
    if !output.success() {
        return None;
    }
    parse_zone_interfaces(&output.stdout)
}

/// Adds or removes a rich rule.
///
/// A port without a `/protocol` suffix is rejected before anything runs.
#[must_use]
pub fn rich_rule(ctx: &ServiceContext, action: Action, rule: &RichRule) -> bool {
    let Some(command) = rich_rule_command(action, rule) else {
        return false;
    };
    apply(ctx, Invocation::shell(command), rule.permanent)
}

/// Adds or removes one object in a zone.
///
/// Permanent interface bindings on CentOS Stream 8 go through NetworkManager
/// instead; removing one that way is not supported and returns `false`.
#[must_use]
pub fn rule_object(
    ctx: &ServiceContext,
    action: Action,
    object_type: ObjectType,
    value: &str,
    zone: Option<&str>,
    permanent: bool,
) -> bool {
    if let (ObjectType::Interface, true, Some(zone)) = (object_type, permanent, zone) {
        if system::linux_distribution(ctx).as_deref() == Some(NMCLI_ZONE_DISTRIBUTION) {
            return match action {
                Action::Add => network::set_interface_zone(ctx, value, zone),
                Action::Remove => false,
            };
        }
    }
    let command = rule_object_command(action, object_type, value, zone, permanent);
    apply(ctx, Invocation::new(command), permanent)
}

/// Changes the default zone. Unknown zones are refused without running
/// anything further.
#[must_use]
pub fn set_default_zone(ctx: &ServiceContext, zone: &str) -> bool {
    let known = all_zones(ctx).is_some_and(|zones| zones.iter().any(|z| z == zone));
    if !known {
        return false;
    }
    let Some(output) =
        ctx.execute_privileged(Invocation::new(format!("firewall-cmd --set-default-zone={zone}")))
    else {
        return false;
    };
    if !output.success() {
        report(&output.stderr);
    }
    output.success()
}

/// Reloads the permanent configuration into the runtime.
#[must_use]
pub fn reload(ctx: &ServiceContext) -> bool {
    let Some(output) = ctx.execute_privileged(Invocation::new("firewall-cmd --reload")) else {
        return false;
    };
    if output.success() {
        return true;
    }
    let reason = if output.stderr.is_empty() { &output.stdout } else { &output.stderr };
    report(reason);
    false
}

/// Builds the `firewall-cmd --<action>-rich-rule` command line.
///
/// Returns `None` when the port is missing its protocol.
#[must_use]
pub fn rich_rule_command(action: Action, rule: &RichRule) -> Option<String> {
    let mut expr = format!("rule family=\"{}\"", rule.family);
    if let Some(source) = &rule.source {
        expr.push_str(&format!(" source address=\"{source}\""));
    }
    if let Some(destination) = &rule.destination {
        expr.push_str(&format!(" destination address=\"{destination}\""));
    }
    if let Some(service) = &rule.service {
        expr.push_str(&format!(" service name=\"{service}\""));
    }
    if let Some(port) = &rule.port {
        let (port, protocol) = port.split_once('/')?;
        expr.push_str(&format!(" port port=\"{port}\" protocol=\"{protocol}\""));
    }
    if let Some(protocol) = &rule.protocol {
        expr.push_str(&format!(" protocol value=\"{protocol}\""));
    }
    expr.push(' ');
    expr.push_str(&rule.action.to_string());

    let mut command = String::from("firewall-cmd");
    if let Some(zone) = &rule.zone {
        command.push_str(&format!(" --zone={zone}"));
    }
    if rule.permanent {
        command.push_str(" --permanent");
    }
    command.push_str(&format!(" --{action}-rich-rule='{expr}'"));
    Some(command)
}

/// Builds the `firewall-cmd --<action>-<type>=<value>` command line.
#[must_use]
pub fn rule_object_command(
    action: Action,
    object_type: ObjectType,
    value: &str,
    zone: Option<&str>,
    permanent: bool,
) -> String {
    let mut command = format!("firewall-cmd --{action}-{object_type}={value}");
    if let Some(zone) = zone {
        command.push_str(&format!(" --zone={zone}"));
    }
    if permanent {
        command.push_str(" --permanent");
    }
    command
}

/// Zone names from `--get-active-zones` output; indented detail lines are
/// skipped.
#[must_use]
pub fn parse_active_zones(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with(' '))
        .map(String::from)
        .collect()
}

/// Space-separated zone names from `--get-zones` output.
#[must_use]
pub fn parse_zone_list(stdout: &str) -> Vec<String> {
    let stripped = stdout.trim_end_matches('\n');
    if stripped.is_empty() {
        return Vec::new();
    }
    stripped.split(' ').map(String::from).collect()
}

/// Interface names from the `interfaces:` line of `--list-all` output.
#[must_use]
pub fn parse_zone_interfaces(stdout: &str) -> Option<Vec<String>> {
    let listed = stdout.split("interfaces: ").nth(1)?;
    Some(
        listed
            .trim_end_matches('\n')
            .split(' ')
            .filter(|ifc| !ifc.is_empty())
            .map(String::from)
            .collect(),
    )
}

fn query(ctx: &ServiceContext, command: &str) -> Option<String> {
    let output = ctx.execute_privileged(Invocation::new(command))?;
    output.success().then_some(output.stdout)
}

/// Runs a rule change and reloads after a successful permanent one.
///
/// The change has landed once it succeeds, so a failed reload is only
/// reported.
fn apply(ctx: &ServiceContext, invocation: Invocation, permanent: bool) -> bool {
    let Some(output) = ctx.execute_privileged(invocation) else {
        return false;
    };
    if !output.success() {
        report(&output.stderr);
        return false;
    }
    if permanent {
        let _ = reload(ctx);
    }
    true
}

fn report(reason: &str) {
    let reason = reason.trim_end();
    if !reason.is_empty() {
        eprint_colorlog(&format!("<{reason}>"), Color::BRed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{out, replay, replay_privileged};

    #[test]
    fn running_requires_exact_state() {
        let (ctx, shell) = replay(vec![
            out(0, "running\n", ""),
            out(252, "", "not running\n"),
            out(0, "running", ""),
        ]);
        assert!(is_running(&ctx));
        assert!(!is_running(&ctx));
        assert!(!is_running(&ctx));
        assert_eq!(shell.issued()[0], "firewall-cmd --state");
    }

    #[test]
    fn active_zones_skip_detail_lines() {
        let stdout = "public\n  interfaces: eth0\ntrusted\n  sources: 10.0.0.0/8\n";
        assert_eq!(parse_active_zones(stdout), vec!["public", "trusted"]);
    }

    #[test]
    fn zone_list_splits_on_spaces() {
        assert_eq!(
            parse_zone_list("block dmz drop external public\n"),
            vec!["block", "dmz", "drop", "external", "public"]
        );
        assert!(parse_zone_list("\n").is_empty());
    }

    #[test]
    fn zone_interfaces_after_marker() {
        assert_eq!(
            parse_zone_interfaces("  interfaces: eth0 eth1\n"),
            Some(vec!["eth0".into(), "eth1".into()])
        );
        assert_eq!(parse_zone_interfaces("  interfaces: \n"), Some(vec![]));
        assert_eq!(parse_zone_interfaces("  services: ssh\n"), None);
    }

    #[test]
    fn zone_interfaces_absent_for_unknown_zone() {
        let (ctx, shell) = replay(vec![out(1, "", "")]);
        assert_eq!(zone_interfaces(&ctx, "nope"), None);
        assert_eq!(shell.issued(), vec!["firewall-cmd --list-all --zone=nope | grep interface"]);
    }

    #[test]
    fn default_zone_strips_newline() {
        let (ctx, _) = replay(vec![out(0, "public\n", "")]);
        assert_eq!(default_zone(&ctx), Some("public".into()));
    }

    #[test]
    fn rich_rule_full_expression() {
        let rule = RichRule {
            action: RuleAction::Reject,
            zone: Some("public".into()),
            permanent: true,
            source: Some("10.0.0.0/8".into()),
            port: Some("8080-8090/tcp".into()),
            ..RichRule::default()
        };
        assert_eq!(
            rich_rule_command(Action::Add, &rule).unwrap(),
            "firewall-cmd --zone=public --permanent --add-rich-rule='rule family=\"ipv4\" \
             source address=\"10.0.0.0/8\" port port=\"8080-8090\" protocol=\"tcp\" reject'"
        );
    }

    #[test]
    fn rich_rule_minimal_expression() {
        let rule = RichRule { service: Some("http".into()), ..RichRule::default() };
        assert_eq!(
            rich_rule_command(Action::Remove, &rule).unwrap(),
            "firewall-cmd --remove-rich-rule='rule family=\"ipv4\" service name=\"http\" accept'"
        );
    }

    #[test]
    fn rich_rule_port_without_protocol_runs_nothing() {
        let (ctx, shell) = replay(vec![]);
        let rule = RichRule { port: Some("443".into()), ..RichRule::default() };
        assert!(!rich_rule(&ctx, Action::Add, &rule));
        assert!(shell.issued().is_empty());
    }

    #[test]
    fn permanent_rich_rule_reloads() {
        let (ctx, shell) = replay(vec![out(0, "success\n", ""), out(0, "success\n", "")]);
        let rule = RichRule { permanent: true, service: Some("ssh".into()), ..RichRule::default() };
        assert!(rich_rule(&ctx, Action::Add, &rule));
        assert_eq!(shell.issued()[1], "firewall-cmd --reload");
    }

    #[test]
    fn runtime_object_does_not_reload() {
        let (ctx, shell) = replay_privileged(vec![out(0, "success\n", "")]);
        assert!(rule_object(&ctx, Action::Add, ObjectType::Port, "443/tcp", Some("public"), false));
        assert_eq!(
            shell.issued(),
            vec!["echo *** | sudo -S firewall-cmd --add-port=443/tcp --zone=public"]
        );
    }

    #[test]
    fn failed_object_change_is_false() {
        let (ctx, _) = replay(vec![out(12, "", "Error: INVALID_SERVICE: nope\n")]);
        assert!(!rule_object(&ctx, Action::Add, ObjectType::Service, "nope", None, true));
    }

    #[test]
    fn permanent_interface_on_centos_stream_uses_nmcli() {
        let (ctx, shell) = replay(vec![
            out(0, "PRETTY_NAME=\"CentOS Stream 8\"\n", ""),
            out(0, "eth1\n", ""),
            out(0, "", ""),
        ]);
        assert!(rule_object(&ctx, Action::Add, ObjectType::Interface, "eth1", Some("internal"), true));
        assert_eq!(shell.issued()[2], "nmcli connection modify 'eth1' connection.zone internal");
    }

    #[test]
    fn permanent_interface_removal_on_centos_stream_is_refused() {
        let (ctx, shell) = replay(vec![out(0, "PRETTY_NAME=\"CentOS Stream 8\"\n", "")]);
        assert!(!rule_object(&ctx, Action::Remove, ObjectType::Interface, "eth1", Some("internal"), true));
        assert_eq!(shell.issued().len(), 1);
    }

    #[test]
    fn permanent_interface_elsewhere_uses_firewalld() {
        let (ctx, shell) = replay(vec![
            out(0, "PRETTY_NAME=\"Rocky Linux 9.3 (Blue Onyx)\"\n", ""),
            out(0, "success\n", ""),
            out(0, "success\n", ""),
        ]);
        assert!(rule_object(&ctx, Action::Add, ObjectType::Interface, "eth1", Some("internal"), true));
        assert_eq!(
            shell.issued()[1..],
            ["firewall-cmd --add-interface=eth1 --zone=internal --permanent", "firewall-cmd --reload"]
        );
    }

    #[test]
    fn default_zone_must_exist() {
        let (ctx, shell) = replay(vec![
            out(0, "block dmz public\n", ""),
            out(0, "block dmz public\n", ""),
            out(0, "success\n", ""),
        ]);
        assert!(!set_default_zone(&ctx, "home"));
        assert!(set_default_zone(&ctx, "public"));
        assert_eq!(shell.issued()[2], "firewall-cmd --set-default-zone=public");
    }

    #[test]
    fn permanent_change_survives_failed_reload() {
        let (ctx, shell) = replay(vec![out(0, "success\n", ""), out(1, "", "reload failed\n")]);
        assert!(rule_object(&ctx, Action::Add, ObjectType::Port, "443/tcp", None, true));
        assert_eq!(
            shell.issued(),
            vec!["firewall-cmd --add-port=443/tcp --permanent", "firewall-cmd --reload"]
        );
    }

    #[test]
    fn failed_default_zone_change_is_false() {
        let (ctx, shell) = replay(vec![
            out(0, "block dmz public\n", ""),
            out(1, "", "Error: COMMAND_FAILED\n"),
        ]);
        assert!(!set_default_zone(&ctx, "dmz"));
        assert_eq!(shell.issued()[1], "firewall-cmd --set-default-zone=dmz");
        assert_eq!(shell.remaining(), 0);
    }

    #[test]
    fn reload_failure_is_false() {
        let (ctx, _) = replay(vec![out(1, "", "")]);
        assert!(!reload(&ctx));
    }
}
