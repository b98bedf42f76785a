//! Diagnostic logging setup.
//!
//! Library crates emit `tracing` events; the CLI routes them to stderr.
//! `RUST_LOG` takes precedence over the level derived from `--quiet` and
//! `--verbose`.

use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Returns the default filter directive for the given flags.
pub fn default_directive(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs the global stderr subscriber.
pub fn init(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}
