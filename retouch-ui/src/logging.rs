// Logging setup for the retouch binary.

use tracing_subscriber::prelude::*;

/// Install a stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    // Default to info for dependencies, debug for our own crates
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,retouch=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
