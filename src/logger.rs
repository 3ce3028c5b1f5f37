use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TESTSCRIBE_LOG";

/// Diagnostics go to stderr so the progress lines on stdout stay clean.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
