//! Host queries: environment variables, distribution name, interface address.
//!
//! None of these escalate; they read what the invoking user can already see.

use crate::context::ServiceContext;
use crate::exec::Invocation;

/// Value of environment variable `name`, as seen by a child shell.
///
/// Runs `env | grep <name>` and takes the first line starting with `name`.
/// The value is the second `=`-separated field, so a value that itself
/// contains `=` is cut at its first `=`.
#[must_use]
pub fn env_value(ctx: &ServiceContext, name: &str) -> Option<String> {
    let output = ctx.execute(&Invocation::shell(format!("env | grep {name}")))?;
    if !output.success() {
        return None;
    }
    parse_env_value(&output.stdout, name)
}

/// Every environment variable of a child process as `(name, value)` pairs.
#[must_use]
pub fn environment(ctx: &ServiceContext) -> Option<Vec<(String, String)>> {
    let output = ctx.execute(&Invocation::new("env"))?;
    output.success().then(|| parse_environment(&output.stdout))
}

/// Pretty name of the running distribution, e.g. `CentOS Stream 8`.
#[must_use]
pub fn linux_distribution(ctx: &ServiceContext) -> Option<String> {
    let output = ctx.execute(&Invocation::shell("cat /etc/os-release | grep PRETTY_NAME"))?;
    if !output.success() {
        return None;
    }
    parse_pretty_name(&output.stdout)
}

/// IPv4 address (with prefix length) assigned to interface `ifc`.
#[must_use]
pub fn interface_ipv4(ctx: &ServiceContext, ifc: &str) -> Option<String> {
    let output = ctx.execute(&Invocation::shell(format!("ip addr | grep {ifc} | grep inet")))?;
    if !output.success() {
        return None;
    }
    parse_ipv4(&output.stdout)
}

/// Picks the value of `name` out of `env` output.
#[must_use]
pub fn parse_env_value(stdout: &str, name: &str) -> Option<String> {
    stdout
        .lines()
        .find(|line| line.starts_with(name))
        .and_then(|line| line.split('=').nth(1))
        .map(String::from)
}

/// Splits `env` output into pairs at each line's first `=`.
///
/// Lines without `=` (continuations of multi-line values) are skipped.
#[must_use]
pub fn parse_environment(stdout: &str) -> Vec<(String, String)> {
    stdout
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Extracts the quoted value of a `PRETTY_NAME="..."` line.
#[must_use]
pub fn parse_pretty_name(stdout: &str) -> Option<String> {
    stdout.split('"').nth(1).map(String::from)
}

/// Second non-empty space-separated field of `ip addr` output.
#[must_use]
pub fn parse_ipv4(stdout: &str) -> Option<String> {
    stdout.split(' ').filter(|field| !field.is_empty()).nth(1).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fail, out, replay};

    #[test]
    fn env_value_takes_first_matching_line() {
        let stdout = "XDG_SESSION_PATH=/x\nPATH=/usr/bin:/bin\nMYPATH=/opt\n";
        assert_eq!(parse_env_value(stdout, "PATH"), Some("/usr/bin:/bin".into()));
    }

    #[test]
    fn env_value_cuts_at_second_equals() {
        assert_eq!(parse_env_value("OPTS=a=b\n", "OPTS"), Some("a".into()));
    }

    #[test]
    fn env_value_absent_when_no_line_matches() {
        assert_eq!(parse_env_value("HOME=/root\n", "SHELL"), None);
        assert_eq!(parse_env_value("", "SHELL"), None);
    }

    #[test]
    fn env_value_runs_grep_pipeline() {
        let (ctx, shell) = replay(vec![out(0, "HOME=/home/ops\n", "")]);
        assert_eq!(env_value(&ctx, "HOME"), Some("/home/ops".into()));
        assert_eq!(shell.issued(), vec!["env | grep HOME"]);
    }

    #[test]
    fn env_value_absent_when_grep_finds_nothing() {
        let (ctx, _) = replay(vec![out(1, "", "")]);
        assert_eq!(env_value(&ctx, "NOPE"), None);
    }

    #[test]
    fn environment_splits_pairs() {
        let pairs = parse_environment("A=1\nB=x=y\ncontinued\n");
        assert_eq!(
            pairs,
            vec![("A".into(), "1".into()), ("B".into(), "x=y".into())]
        );
    }

    #[test]
    fn environment_absent_on_launch_failure() {
        let (ctx, _) = replay(vec![fail("failed to launch `env`")]);
        assert_eq!(environment(&ctx), None);
    }

    #[test]
    fn pretty_name_between_quotes() {
        assert_eq!(
            parse_pretty_name("PRETTY_NAME=\"CentOS Stream 8\"\n"),
            Some("CentOS Stream 8".into())
        );
        assert_eq!(parse_pretty_name("PRETTY_NAME=unquoted\n"), None);
    }

    #[test]
    fn linux_distribution_reads_os_release() {
        let (ctx, shell) = replay(vec![out(0, "PRETTY_NAME=\"Ubuntu 22.04.3 LTS\"\n", "")]);
        assert_eq!(linux_distribution(&ctx), Some("Ubuntu 22.04.3 LTS".into()));
        assert_eq!(shell.issued(), vec!["cat /etc/os-release | grep PRETTY_NAME"]);
    }

    #[test]
    fn ipv4_is_second_field() {
        let stdout = "    inet 10.0.2.15/24 brd 10.0.2.255 scope global dynamic eth0\n";
        assert_eq!(parse_ipv4(stdout), Some("10.0.2.15/24".into()));
        assert_eq!(parse_ipv4(""), None);
    }

    #[test]
    fn interface_ipv4_absent_for_unknown_interface() {
        let (ctx, shell) = replay(vec![out(1, "", "")]);
        assert_eq!(interface_ipv4(&ctx, "wg9"), None);
        assert_eq!(shell.issued(), vec!["ip addr | grep wg9 | grep inet"]);
    }
}
