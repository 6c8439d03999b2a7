//! Tracing subscriber setup for hosts and demos.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber.
///
/// `RUST_LOG` wins when it parses; otherwise `default_directive` is used, and
/// if that is malformed too, only errors are shown. Calling this more than
/// once is harmless: later calls leave the first subscriber in place.
///
/// ```
/// sombrero_ui::logging::init_tracing("warn,sombrero_components=debug");
/// sombrero_ui::logging::init_tracing("info");
/// ```
pub fn init_tracing(default_directive: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match EnvFilter::try_new(default_directive) {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
