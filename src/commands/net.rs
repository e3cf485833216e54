//! `linux-cmd net` handlers.

use crate::cli::NetCommand;
use crate::context::ServiceContext;
use crate::network;

use super::{print_flag, print_value};

/// Execute a `net` subcommand.
pub fn run(ctx: &ServiceContext, command: &NetCommand) -> bool {
    match command {
        NetCommand::ConnectionId { ifc } => print_value(network::connection_id(ctx, ifc)),
        NetCommand::Zone { ifc } => print_value(network::interface_zone(ctx, ifc)),
        NetCommand::Up { connection } => print_flag(network::up(ctx, connection)),
        NetCommand::Down { ifc } => print_flag(network::down(ctx, ifc)),
        NetCommand::Reload => print_flag(network::reload_connections(ctx)),
        NetCommand::SetZone { ifc, zone } => print_flag(network::set_interface_zone(ctx, ifc, zone)),
    }
}
