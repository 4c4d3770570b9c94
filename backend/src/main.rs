//! Backend entry point: configuration, migrations, and the HTTP listener.

mod server;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use server::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::parse();
    server::run_migrations(&config.database_url).await?;
    let state = server::build_state(&config).await?;

    tracing::info!(addr = %config.bind_addr, "starting server");
    server::create_server(state, config.bind_addr)?.await
}
