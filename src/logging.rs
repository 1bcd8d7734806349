use tracing_subscriber::EnvFilter;

/// Initialize tracing to stderr with an env-controlled filter.
///
/// Respects `RUST_LOG`; defaults to `info`. Stderr keeps log lines out of
/// the command output, which is written to stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}
