//! `linux-cmd firewall` handlers.

use crate::cli::{FirewallCommand, RichRuleArgs};
use crate::context::ServiceContext;
use crate::firewall::{self, RichRule};

use super::{print_flag, print_list, print_value};

/// Execute a `firewall` subcommand.
pub fn run(ctx: &ServiceContext, command: &FirewallCommand) -> bool {
    match command {
        FirewallCommand::State => print_flag(firewall::is_running(ctx)),
        FirewallCommand::ActiveZones => print_list(firewall::active_zone_names(ctx)),
        FirewallCommand::Zones => print_list(firewall::all_zones(ctx)),
        FirewallCommand::DefaultZone => print_value(firewall::default_zone(ctx)),
        FirewallCommand::ZoneInterfaces { zone } => print_list(firewall::zone_interfaces(ctx, zone)),
        FirewallCommand::RichRule(args) => {
            print_flag(firewall::rich_rule(ctx, args.action, &rich_rule(args)))
        }
        FirewallCommand::Object { action, object_type, value, zone, permanent } => {
            print_flag(firewall::rule_object(
                ctx,
                *action,
                *object_type,
                value,
                zone.as_deref(),
                *permanent,
            ))
        }
        FirewallCommand::SetDefaultZone { zone } => print_flag(firewall::set_default_zone(ctx, zone)),
        FirewallCommand::Reload => print_flag(firewall::reload(ctx)),
    }
}

fn rich_rule(args: &RichRuleArgs) -> RichRule {
    RichRule {
        action: args.verdict,
        family: args.family.clone(),
        zone: args.zone.clone(),
        permanent: args.permanent,
        source: args.source.clone(),
        destination: args.destination.clone(),
        service: args.service.clone(),
        port: args.port.clone(),
        protocol: args.protocol.clone(),
    }
}
