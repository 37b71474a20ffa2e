//! Tracing bootstrap.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with an env-filter (RUST_LOG) and a
/// formatted stdout layer. Safe to call more than once; subsequent calls are
/// no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pictura=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
