//! Logging and tracing bootstrap.

use tracing_subscriber::EnvFilter;

use shelf_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing/logging pipeline.
///
/// `RUST_LOG` wins when set; otherwise the default level is `info`, or
/// `debug` when the server debug toggle is on. Safe to call more than once;
/// later calls are ignored.
pub fn init(settings: &TelemetrySettings, debug: bool) {
    let default_directive = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match settings.log_format {
        LogFormat::Pretty => builder.try_init().ok(),
        LogFormat::Json => builder.json().try_init().ok(),
    };
}
