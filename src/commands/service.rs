//! `linux-cmd service` handlers.

use crate::cli::ServiceCommand;
use crate::context::ServiceContext;
use crate::service;

use super::print_flag;

/// Execute a `service` subcommand.
pub fn run(ctx: &ServiceContext, command: &ServiceCommand) -> bool {
    print_flag(match command {
        ServiceCommand::IsEnabled { service } => service::is_enabled(ctx, service),
        ServiceCommand::IsRunning { service } => service::is_running(ctx, service),
        ServiceCommand::Enable { service } => service::enable(ctx, service),
        ServiceCommand::Disable { service } => service::disable(ctx, service),
        ServiceCommand::Start { service } => service::start(ctx, service),
        ServiceCommand::Stop { service } => service::stop(ctx, service),
        ServiceCommand::Restart { service } => service::restart(ctx, service),
    })
}
