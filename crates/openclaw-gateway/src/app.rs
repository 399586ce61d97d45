use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use openclaw_core::Runtime;
use openclaw_dispatch::DispatchContext;
use openclaw_memory::{ConversationBuffer, MemoryStore};
use openclaw_scheduler::JobCompiler;
use openclaw_sql::PostgresClient;
use openclaw_store::{PendingQuestionStore, TaskStore};
use openclaw_telegram::OwnerChannel;
use tokio::sync::Mutex;

use crate::google::GoogleServices;

/// Central shared state, handed to every Axum handler as `Arc<AppState>`
/// (§9 Design Notes: "one `Runtime` value owned by the process entry
/// point... constructed before the HTTP server binds").
pub struct AppState {
    pub runtime: Runtime,
    pub tasks: TaskStore,
    pub pending: PendingQuestionStore,
    pub memory: MemoryStore,
    /// Read-modify-write critical section for the conversation ring file
    /// (§5: "structured JSON files... require a read-modify-write
    /// critical section per process").
    pub conversation: Mutex<ConversationBuffer>,
    pub dispatch: DispatchContext,
    pub scheduler: JobCompiler,
    pub google: GoogleServices,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(runtime: Runtime, owner: OwnerChannel) -> Self {
        let sql = PostgresClient::new(&runtime.config.postgres);
        let tasks = TaskStore::new(sql.clone());
        let pending = PendingQuestionStore::new(sql.clone());
        let memory = MemoryStore::new(sql);
        let conversation = ConversationBuffer::load(&runtime.paths.conversation_buffer_file());
        let dispatch = DispatchContext {
            paths: runtime.paths.clone(),
            agent_cli: runtime.config.agent_cli.clone(),
            router: runtime.config.router.clone(),
            notifier: Arc::new(owner),
        };
        let scheduler = JobCompiler::new(runtime.paths.clone(), runtime.config.router.port);
        let google = GoogleServices::new(runtime.paths.clone());
        Self {
            runtime,
            tasks,
            pending,
            memory,
            conversation: Mutex::new(conversation),
            dispatch,
            scheduler,
            google,
            http: reqwest::Client::new(),
        }
    }
}

/// Assemble the full Axum router (§4.1 endpoint table).
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/route", post(crate::http::route::route_handler))
        .route(
            "/owner-message",
            post(crate::http::owner_message::owner_message_handler),
        )
        .route("/ask-owner", post(crate::http::ask_owner::ask_owner_handler))
        .route("/reply", post(crate::http::reply::reply_handler))
        .route("/pending", get(crate::http::pending::pending_handler))
        .route("/gmail/unread", get(crate::http::google::gmail_unread))
        .route("/gmail/inbox", get(crate::http::google::gmail_inbox))
        .route("/gmail/send", post(crate::http::google::gmail_send))
        .route("/gmail/read", post(crate::http::google::gmail_read))
        .route("/gmail/search", post(crate::http::google::gmail_search))
        .route("/calendar/today", get(crate::http::google::calendar_today))
        .route("/calendar/week", get(crate::http::google::calendar_week))
        .route(
            "/calendar/create",
            post(crate::http::google::calendar_create),
        )
        .route(
            "/calendar/delete",
            post(crate::http::google::calendar_delete),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
