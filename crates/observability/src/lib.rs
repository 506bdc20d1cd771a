//! Tracing/logging setup shared by the binaries.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide logging using `STOCKTAKE_LOG_FORMAT` (default JSON).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    let format: LogFormat = std::env::var("STOCKTAKE_LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    crate::tracing::init(format);
}
