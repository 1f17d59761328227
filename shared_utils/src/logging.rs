use tracing_subscriber::EnvFilter;

/// Installs the process-wide fmt subscriber for a binary.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`)
/// is used. Calling this twice is a no-op. Libraries must not call it.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
