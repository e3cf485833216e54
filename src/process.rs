//! Process lookup through `ps`.

use crate::context::ServiceContext;
use crate::exec::Invocation;

/// `ps -aux` lines mentioning `pid`.
///
/// The pattern is matched anywhere on the line, so other processes whose
/// line contains the digits are included too. The `grep` process itself
/// is dropped.
#[must_use]
pub fn process_by_id(ctx: &ServiceContext, pid: u32) -> Option<Vec<String>> {
    let output = ctx.execute_privileged(Invocation::shell(format!("ps -aux | grep {pid}")))?;
    output.success().then(|| parse_process_lines(&output.stdout))
}

/// Non-empty lines of `ps | grep` output, minus the trailing `grep` line.
#[must_use]
pub fn parse_process_lines(stdout: &str) -> Vec<String> {
    let mut lines: Vec<String> =
        stdout.lines().filter(|line| !line.is_empty()).map(String::from).collect();
    lines.pop();
    lines
}
