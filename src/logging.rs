//! Logging setup for the `linux-cmd` binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`; an unparsable directive
/// falls back to `warn`. Logs go to stderr so they never mix with tool output
/// printed on stdout. Calling this more than once is harmless.
pub fn init(default_filter: &str) {
    let filter = create_env_filter(std::env::var("RUST_LOG").ok().as_deref(), default_filter);
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).try_init();
}

/// Build the filter from an optional `RUST_LOG` value and a fallback directive.
fn create_env_filter(rust_log: Option<&str>, default_filter: &str) -> EnvFilter {
    let directive =
        rust_log.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default_filter);
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}
