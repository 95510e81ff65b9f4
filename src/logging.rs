use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Diagnostic log level when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVE: &str = "leftovers=warn";

/// Initializes diagnostics on stderr, filtered by `RUST_LOG`.
///
/// Stdout stays reserved for prompts and the SUCCESS/ERROR audit lines.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}
