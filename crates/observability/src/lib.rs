//! Tracing/logging setup shared by every dashgate binary.

pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat, UnknownLogFormat};

/// Initialize process-wide logging with the default configuration.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(&LogConfig::default());
}

/// Initialize process-wide logging with an explicit configuration.
pub fn init_with(config: &LogConfig) {
    self::tracing::init(config);
}
