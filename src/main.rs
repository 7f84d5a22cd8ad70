use anyhow::Context;
use dotenvy::dotenv;
use log::info;

use stockroom::{config::Config, create_router, database::open_store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("invalid configuration")?;

    let store = open_store(&config)
        .await
        .context("failed to open store")?;
    info!("Store ready ({} backend)", store.backend());

    if config.token_secret.is_some() {
        info!("API token verification enabled");
    }

    let app = create_router(store, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Stockroom server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
