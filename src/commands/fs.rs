//! `linux-cmd fs` handlers.

use crate::cli::FsCommand;
use crate::colorlog;
use crate::context::ServiceContext;
use crate::filesystem;

use super::{print_flag, print_list, print_value};

/// Execute an `fs` subcommand.
pub fn run(ctx: &ServiceContext, command: &FsCommand) -> bool {
    match command {
        FsCommand::Symlink { target, link } => print_flag(filesystem::create_symlink(ctx, target, link)),
        FsCommand::Exists { path } => print_flag(filesystem::path_exists(ctx, path)),
        FsCommand::Type { path } => print_value(filesystem::path_type(ctx, path)),
        FsCommand::Cat { path } => match filesystem::file_contents(ctx, path) {
            // Contents already carry their own trailing newline.
            Some(contents) => {
                colorlog::print_inline(&contents);
                true
            }
            None => false,
        },
        FsCommand::Ls { path } => print_list(filesystem::list_path(ctx, path)),
        FsCommand::Find { name, root } => print_list(filesystem::find_by_name(ctx, name, root)),
        FsCommand::Write { path, contents } => print_flag(filesystem::write_file(ctx, path, contents)),
        FsCommand::Untar { tarball, dest } => {
            print_flag(filesystem::tar_unzip(ctx, tarball, dest.as_deref()))
        }
        FsCommand::Tar { save_as, files } => print_flag(filesystem::tar_zip(ctx, files, save_as)),
        FsCommand::Wget { url, dest } => print_flag(filesystem::wget_download(ctx, url, dest.as_deref())),
    }
}
