//! `linux-cmd account` handlers.

use crate::account;
use crate::cli::AccountCommand;
use crate::context::ServiceContext;

use super::{print_flag, print_value};

/// Execute an `account` subcommand.
pub fn run(ctx: &ServiceContext, command: &AccountCommand) -> bool {
    match command {
        AccountCommand::Whoami => print_value(account::current_username(ctx)),
        AccountCommand::Home => print_value(account::home_dir(ctx)),
        AccountCommand::IsSudoer => print_flag(account::is_root_or_sudoer(ctx)),
        AccountCommand::Exists { username } => print_flag(account::user_exists(ctx, username)),
    }
}
