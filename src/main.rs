use ferrum_containers::{server, ServerConfig};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (INFO by default, RUST_LOG=debug for command tracing)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Optional JSON config file as first argument
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = ServerConfig::load(path.as_deref())?;

    info!("ferrum-containers server starting on {}", config.addr);

    server::run(&config).await
}
