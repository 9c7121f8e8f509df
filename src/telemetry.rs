//! Tracing initialization for binaries embedding the manager.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber honoring `RUST_LOG`.
///
/// Library consumers with their own subscriber should skip this.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
