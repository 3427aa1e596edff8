use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. A directive from the command line wins,
/// then `RUST_LOG`, then the configured level.
pub(crate) fn init(requested: Option<&str>, configured: &str) {
    let filter = match requested {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}
