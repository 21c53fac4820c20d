// src/logging.rs

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Инициализировать tracing один раз; RUST_LOG имеет приоритет над конфигом
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.enable_json_output {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        // Подписчик уже установлен (например, повторный вызов в тестах)
        eprintln!("tracing already initialised: {}", e);
    }
}
