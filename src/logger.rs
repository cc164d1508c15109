use env_logger::{Builder, Env};

/// Installs `env_logger` as the global logger.
/// `LOG_LEVEL` takes `env_logger` filter directives, `LOG_STYLE` controls colors.
pub fn setup_logger() {
    let env = Env::new()
        .filter_or("LOG_LEVEL", "info")
        .write_style_or("LOG_STYLE", "auto");

    Builder::from_env(env).format_timestamp_millis().init();

    log::info!(target: "init", "Logger initialized.");
}
