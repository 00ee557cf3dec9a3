//! Diagnostic tracing for the updater.
//!
//! Tracing events go to stderr and are controlled by `RUST_LOG`. The run
//! report printed by `output` is product output and goes to stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when `RUST_LOG` is unset
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "gemup=debug"
    } else {
        "warn"
    }
}

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; defaults to `warn`, or `gemup=debug` with `--verbose`.
/// Output: stderr, compact format. A second call is a no-op.
///
/// # Example
/// ```bash
/// RUST_LOG=gemup=trace gemup -c rake test
/// ```
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
