// src/main.rs

use clap::Parser;
use nextdomen_console::cli::{self, Cli};
use nextdomen_console::config::AppConfig;
use nextdomen_console::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env необязателен
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging);

    cli::run(cli, config).await
}
