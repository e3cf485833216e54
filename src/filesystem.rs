//! File and directory helpers built on `ls`, `find`, `cat`, `tar`, `wget` and `ln`.

use std::fmt;
use std::path::Path;

use crate::context::ServiceContext;
use crate::exec::Invocation;

/// Kind of filesystem entry, taken from the first column of `ls -lhd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// Regular file (`-`).
    File,
    /// Directory (`d`).
    Directory,
    /// Symbolic link (`l`).
    Link,
    /// `ls` succeeded but printed nothing.
    NonFile,
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Link => "link",
            Self::NonFile => "non-file",
        })
    }
}

/// Creates a symbolic link at `link` pointing to `target`.
#[must_use]
pub fn create_symlink(ctx: &ServiceContext, target: &str, link: &str) -> bool {
    ctx.execute_privileged(Invocation::new(format!("ln -s {target} {link}")))
        .is_some_and(|output| output.success())
}

/// Whether `path` exists, as visible to the invoking user.
#[must_use]
pub fn path_exists(ctx: &ServiceContext, path: &str) -> bool {
    ctx.execute(&Invocation::new(format!("ls -lhd {path}")))
        .is_some_and(|output| output.success() && !output.stdout.is_empty())
}

/// Kind of entry at `path`, or `None` if `ls` fails or prints an
/// unrecognized type character (sockets, devices, pipes).
#[must_use]
pub fn path_type(ctx: &ServiceContext, path: &str) -> Option<PathType> {
    let output = ctx.execute_privileged(Invocation::new(format!("ls -lhd {path}")))?;
    if !output.success() {
        return None;
    }
    parse_path_type(&output.stdout)
}

/// Contents of the regular file at `path`.
#[must_use]
pub fn file_contents(ctx: &ServiceContext, path: &str) -> Option<String> {
    if path_type(ctx, path)? != PathType::File {
        return None;
    }
    let output = ctx.execute_privileged(Invocation::new(format!("cat {path}")))?;
    output.success().then_some(output.stdout)
}

/// Entries of directory `path`, one per line of `ls` output.
#[must_use]
pub fn list_path(ctx: &ServiceContext, path: &str) -> Option<Vec<String>> {
    let output = ctx.execute_privileged(Invocation::new(format!("ls {path}")))?;
    output.success().then(|| non_empty_lines(&output.stdout))
}

/// Paths under `root` whose name matches `name` (`find <root> -name <name>`).
#[must_use]
pub fn find_by_name(ctx: &ServiceContext, name: &str, root: &str) -> Option<Vec<String>> {
    let output = ctx.execute_privileged(Invocation::new(format!("find {root} -name {name}")))?;
    output.success().then(|| non_empty_lines(&output.stdout))
}

/// Overwrites `path` with `contents` followed by a newline.
///
/// `contents` is passed to `echo` unquoted, so the shell word-splits and
/// expands it.
#[must_use]
pub fn write_file(ctx: &ServiceContext, path: &str, contents: &str) -> bool {
    ctx.execute_privileged(Invocation::shell(format!("echo {contents} > {path}")))
        .is_some_and(|output| output.success())
}

/// Extracts `tarball` into `dest`, or next to the tarball when `dest` is
/// `None`.
///
/// Exit status 2 (some members could not be restored) still counts as
/// success.
#[must_use]
pub fn tar_unzip(ctx: &ServiceContext, tarball: &str, dest: Option<&str>) -> bool {
    ctx.execute_privileged(Invocation::new(tar_unzip_command(tarball, dest)))
        .is_some_and(|output| output.exited_with_any(&[0, 2]))
}

/// Packs `files` into the archive `save_as`, appending `.tar` if missing.
#[must_use]
pub fn tar_zip(ctx: &ServiceContext, files: &[String], save_as: &str) -> bool {
    ctx.execute_privileged(Invocation::new(tar_zip_command(files, save_as)))
        .is_some_and(|output| output.success())
}

/// Downloads `url` quietly, into `dest` when given.
///
/// Exit status 1 (generic wget error) still counts as success.
#[must_use]
pub fn wget_download(ctx: &ServiceContext, url: &str, dest: Option<&str>) -> bool {
    let command = match dest {
        Some(dest) => format!("wget -q {url} -P {dest}"),
        None => format!("wget -q {url}"),
    };
    ctx.execute_privileged(Invocation::new(command))
        .is_some_and(|output| output.exited_with_any(&[0, 1]))
}

/// Maps the first character of `ls -lhd` output to a [`PathType`].
#[must_use]
pub fn parse_path_type(stdout: &str) -> Option<PathType> {
    match stdout.chars().next() {
        None => Some(PathType::NonFile),
        Some('-') => Some(PathType::File),
        Some('d') => Some(PathType::Directory),
        Some('l') => Some(PathType::Link),
        Some(_) => None,
    }
}

/// Builds the `tar -xf` command line.
#[must_use]
pub fn tar_unzip_command(tarball: &str, dest: Option<&str>) -> String {
    let dest = dest.map_or_else(|| parent_dir(tarball), String::from);
    format!("tar -xf {tarball} -C {dest}")
}

/// Builds the `tar -cvf` command line.
#[must_use]
pub fn tar_zip_command(files: &[String], save_as: &str) -> String {
    let archive = if save_as.ends_with(".tar") {
        save_as.to_string()
    } else {
        format!("{save_as}.tar")
    };
    format!("tar -cvf {archive} {}", files.join(" "))
}

fn parent_dir(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
        _ => ".".to_string(),
    }
}

fn non_empty_lines(stdout: &str) -> Vec<String> {
    stdout.lines().filter(|line| !line.is_empty()).map(String::from).collect()
}
