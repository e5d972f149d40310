//! Tracing subscriber setup. Logs go to stderr so stdout stays a clean report.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins; otherwise `warn`, or
/// `debug` for this crate when `verbose` is set.
pub fn init(verbose: bool) {
    let fallback = if verbose { "dscheck=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
