use tracing_subscriber::{prelude::*, util::SubscriberInitExt, EnvFilter};

/// Installs the indexer's global subscriber: plain-text output, filtered
/// by `RUST_LOG`. Call once at process startup.
pub fn init() {
    tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}
