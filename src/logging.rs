//! Tracing subscriber setup for hosts that do not bring their own.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global subscriber filtered by `RUST_LOG` (default `info`).
/// Safe to call when the host already installed one; the second install is
/// ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
