//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing on stderr.
///
/// `RUST_LOG` wins over `default_filter` when set. Stdout stays reserved for
/// command output.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
