//! AdventureWorks HR/Sales server - Main entry point

use anyhow::Result;
use aw_common::logging::{init_logging, LogConfig};
use tracing::info;

use aw_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::builder()
        .log_file_prefix("aw-server")
        .filter_directives("aw_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    // Keep the guard alive so file output is flushed on exit
    let _log_guard = init_logging(&log_config)?;

    info!("Starting AdventureWorks server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await?;

    Ok(())
}
