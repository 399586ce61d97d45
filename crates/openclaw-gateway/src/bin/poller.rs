//! One-shot Telegram poller tick (§4.6), intended to be driven by an
//! external periodic scheduler rather than run as a standing loop.

use std::sync::Arc;

use openclaw_core::Runtime;
use openclaw_dispatch::DispatchContext;
use openclaw_sql::PostgresClient;
use openclaw_store::{PendingQuestionStore, TaskStore};
use openclaw_telegram::{run_tick, LocalCommands, PollerConfig, TelegramClient};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openclaw_poller=info".into()),
        )
        .init();

    let config_path = std::env::var("OPENCLAW_CONFIG").ok();
    let runtime = Runtime::init(config_path.as_deref())?;

    let sql = PostgresClient::new(&runtime.config.postgres);
    let tasks = TaskStore::new(sql.clone());
    let pending = PendingQuestionStore::new(sql);
    let dispatch = DispatchContext {
        paths: runtime.paths.clone(),
        agent_cli: runtime.config.agent_cli.clone(),
        router: runtime.config.router.clone(),
        notifier: Arc::new(openclaw_telegram::OwnerChannel {
            client: TelegramClient::new(runtime.config.telegram.bot_token.clone()),
            owner_chat_id: runtime.config.telegram.chat_id.parse().unwrap_or(0),
        }),
    };

    let telegram = TelegramClient::new(runtime.config.telegram.bot_token.clone());
    let local = LocalCommands::new(tasks, pending, dispatch);
    let http = reqwest::Client::new();
    let poller_config = PollerConfig {
        owner_chat_id: runtime.config.telegram.chat_id.parse().unwrap_or(0),
        allow_from: runtime.config.telegram.allow_from.clone(),
        ack_reaction: runtime.config.telegram.ack_reaction.clone(),
        router_base_url: format!("http://127.0.0.1:{}", runtime.config.router.port),
    };

    runtime.paths.ensure_inbox_dir()?;
    let offset = run_tick(
        &telegram,
        &local,
        &http,
        &poller_config,
        &runtime.paths.telegram_offset_file(),
        &runtime.paths.inbox_dir,
    )
    .await;

    info!("poller tick complete, offset now {offset}");
    Ok(())
}
