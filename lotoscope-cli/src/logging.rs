use tracing_subscriber::{fmt, EnvFilter};

/// Initialise les logs sur stderr. Niveau piloté par RUST_LOG
/// (ex. `RUST_LOG=lotoscope_engine=debug`), `warn` par défaut.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
