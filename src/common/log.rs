//! Logger initialisation

/// Initialise the global logger.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
///
/// # Arguments
///
/// * `level` - Default filter, e.g. `"warn"` or `"debug"`
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    // A second initialisation (e.g. from tests) is not an error for us
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
