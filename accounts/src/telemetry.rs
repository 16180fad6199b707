//! Tracing subscriber set-up for binaries and tests embedding the crate.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "accounts_model=debug";

/// Installs a global fmt subscriber filtered by `RUST_LOG` or `default_filter`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
