use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

mod app;
mod classify;
mod commands;
mod google;
mod http;

use openclaw_core::Runtime;
use openclaw_telegram::{OwnerChannel, TelegramClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openclaw_gateway=info,tower_http=debug".into()),
        )
        .init();

    let config_path = std::env::var("OPENCLAW_CONFIG").ok();
    let runtime = Runtime::init(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Runtime init failed ({e}), falling back to unconfigured defaults");
        Runtime::init(None).expect("default config must load")
    });

    let port = runtime.config.router.port;
    let owner_chat_id: i64 = runtime.config.telegram.chat_id.parse().unwrap_or_else(|_| {
        warn!("telegram.chat_id is not a valid integer, owner notifications will fail");
        0
    });
    let owner = OwnerChannel {
        client: TelegramClient::new(runtime.config.telegram.bot_token.clone()),
        owner_chat_id,
    };

    let state = Arc::new(app::AppState::new(runtime, owner));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("127.0.0.1:{port}").parse()?;
    info!("openclaw gateway listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
