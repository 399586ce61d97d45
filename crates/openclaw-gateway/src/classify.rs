//! `route_text` (§4.1): the 12-step classification ladder applied to every
//! `POST /route` body and to everything the channel poller doesn't resolve
//! locally. Declared order, first match wins.

use std::sync::Arc;

use chrono::Utc;
use openclaw_core::text::{preview, sanitize_project_name};
use openclaw_dispatch::{
    dispatch_followup, queued_reply, record_conversation, run_adhoc_pipeline, run_ask_pipeline,
    run_plan_pipeline, run_prompt_dry_pipeline, run_think_pipeline,
};
use openclaw_memory::Role;
use openclaw_store::{Agent, TaskStore};

use crate::app::AppState;
use crate::commands::{briefing, info, links, notes};

pub async fn route_text(state: &Arc<AppState>, text: &str) -> String {
    let trimmed = text.trim();

    if let Some(rest) = strip_command(trimmed, "/plan") {
        return step_plan(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/prompt").or_else(|| strip_command(trimmed, "/thinkdry")) {
        return step_prompt_dry(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/think") {
        return step_think(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/lesson") {
        return step_lesson(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/project") {
        return step_project(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/adhoc") {
        return step_adhoc(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/ask") {
        return step_ask(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/schedule") {
        return step_schedule(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/jobs") {
        return step_jobs(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/deletejob") {
        return step_delete_job(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/pending") {
        return step_pending(state, rest).await;
    }
    if let Some(rest) = strip_command(trimmed, "/answer") {
        return step_answer(state, rest).await;
    }

    if let Some(reply) = step_local_handlers(state, trimmed).await {
        return reply;
    }

    step_fallthrough(state, trimmed).await
}

/// Case-insensitive prefix match on a `/command` token, returning the
/// trimmed remainder when it matches (§4.1: "Commands are case-insensitive
/// prefix tokens").
fn strip_command<'a>(text: &'a str, command: &str) -> Option<&'a str> {
    if text.len() < command.len() {
        return None;
    }
    let (head, tail) = text.split_at(command.len());
    if !head.eq_ignore_ascii_case(command) {
        return None;
    }
    if !tail.is_empty() && !tail.starts_with(char::is_whitespace) {
        return None;
    }
    Some(tail.trim())
}

async fn step_plan(state: &Arc<AppState>, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: /plan <request>".to_string();
    }
    let ctx = state.dispatch.clone();
    let request = rest.to_string();
    tokio::spawn(async move {
        run_plan_pipeline(&ctx, &request).await;
    });
    queued_reply("Queued for planner", rest)
}

async fn step_prompt_dry(state: &Arc<AppState>, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: /prompt <request>".to_string();
    }
    let ctx = state.dispatch.clone();
    let request = rest.to_string();
    tokio::spawn(async move {
        run_prompt_dry_pipeline(&ctx, &request).await;
    });
    queued_reply("Queued prompt optimization", rest)
}

async fn step_think(state: &Arc<AppState>, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: /think <request>".to_string();
    }
    let ctx = state.dispatch.clone();
    let request = rest.to_string();
    tokio::spawn(async move {
        run_think_pipeline(&ctx, &request).await;
    });
    queued_reply("Queued for think+plan", rest)
}

async fn step_lesson(state: &Arc<AppState>, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: /lesson <lesson learned>".to_string();
    }
    if let Err(e) = state.runtime.paths.ensure_context_dirs() {
        return format!("Failed to create context directory: {e}");
    }
    let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let line = format!("[{stamp}] {rest}\n");
    if let Err(e) = append_to(&state.runtime.paths.lessons_file(), &line) {
        return format!("Failed to save lesson: {e}");
    }
    state.memory.store_lesson(rest).await;
    "Lesson saved for future tasks.".to_string()
}

fn append_to(path: &std::path::Path, text: &str) -> std::io::Result<()> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())
}

/// Project-note parsing (§4.1): `<proj>|<note>`, or `<proj>:<note>` only if
/// `<proj>` has no internal whitespace, or plain `<note>` inferring
/// `<proj>` from the most recent task's project field.
async fn parse_project_note(tasks: &TaskStore, raw: &str) -> Option<(String, String)> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some((project, note)) = value.split_once('|') {
        let (project, note) = (project.trim(), note.trim());
        if !project.is_empty() && !note.is_empty() {
            return Some((project.to_string(), note.to_string()));
        }
    }

    if let Some((project, note)) = value.split_once(':') {
        let (project, note) = (project.trim(), note.trim());
        if !project.is_empty() && !note.is_empty() && !project.contains(char::is_whitespace) {
            return Some((project.to_string(), note.to_string()));
        }
    }

    let inferred = tasks.latest_project_name().await;
    if inferred.is_empty() {
        None
    } else {
        Some((inferred, value.to_string()))
    }
}

async fn step_project(state: &Arc<AppState>, rest: &str) -> String {
    let Some((project, note)) = parse_project_note(&state.tasks, rest).await else {
        return "Usage: /project <project>|<note> (or /project <note> when a recent project exists)"
            .to_string();
    };

    if let Err(e) = state.runtime.paths.ensure_context_dirs() {
        return format!("Failed to create context directory: {e}");
    }
    let sanitized = sanitize_project_name(&project);
    let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let line = format!("[{stamp}] {note}\n");
    if let Err(e) = append_to(&state.runtime.paths.project_file(&sanitized), &line) {
        return format!("Failed to save project note: {e}");
    }
    state.memory.store_project_context(&project, &note).await;
    format!("Saved project context for {project}.")
}

async fn step_adhoc(state: &Arc<AppState>, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: /adhoc <instruction>".to_string();
    }
    let ctx = state.dispatch.clone();
    let instruction = rest.to_string();
    let timeout = state.runtime.config.router.adhoc_timeout_sec;
    tokio::spawn(async move {
        run_adhoc_pipeline(&ctx, &instruction, timeout).await;
    });
    queued_reply("Queued adhoc", rest)
}

/// `/ask [<agent>] <q>` (§4.1 step 7): an optional leading agent token,
/// defaulting to planner.
async fn step_ask(state: &Arc<AppState>, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: /ask [agent] <question>".to_string();
    }
    let split = rest.split_once(char::is_whitespace);
    let (agent, question) = match split.and_then(|(head, tail)| head.parse::<Agent>().ok().map(|a| (a, tail))) {
        Some((agent, tail)) => (agent, tail.trim()),
        None => (Agent::Planner, rest),
    };
    if question.is_empty() {
        return "Usage: /ask [agent] <question>".to_string();
    }

    let ctx = state.dispatch.clone();
    let question_owned = question.to_string();
    tokio::spawn(async move {
        run_ask_pipeline(&ctx, &agent.to_string(), &question_owned).await;
    });
    String::new()
}

async fn step_schedule(state: &Arc<AppState>, rest: &str) -> String {
    let mut parts = rest.splitn(6, char::is_whitespace);
    let fields: Vec<&str> = (&mut parts).take(5).collect();
    let description = parts.next().unwrap_or("").trim();
    if fields.len() < 5 || description.is_empty() {
        return "Usage: /schedule <min> <hr> <dom> <mon> <dow> <description>".to_string();
    }
    let cron_expr = fields.join(" ");
    let iso_now = Utc::now().to_rfc3339();
    match state.scheduler.schedule_job(&cron_expr, description, &iso_now).await {
        Ok(id) => format!("Scheduled job {id}."),
        Err(e) => e,
    }
}

async fn step_jobs(state: &Arc<AppState>, _rest: &str) -> String {
    let jobs = state.scheduler.list_jobs().await;
    if jobs.is_empty() {
        return "No scheduled jobs.".to_string();
    }
    let mut lines = vec!["Scheduled jobs:".to_string()];
    lines.extend(jobs.iter().map(|j| j.format()));
    lines.join("\n")
}

async fn step_delete_job(state: &Arc<AppState>, rest: &str) -> String {
    let target = rest.trim();
    if target.is_empty() {
        return "Usage: /deletejob <id|all>".to_string();
    }
    let removed = state.scheduler.delete_job(target).await;
    format!("Removed {removed} job(s).")
}

async fn step_pending(state: &Arc<AppState>, _rest: &str) -> String {
    let questions = state.pending.list_pending().await;
    if questions.is_empty() {
        return "No pending questions.".to_string();
    }
    let mut lines = vec!["Pending questions:".to_string()];
    for q in questions {
        lines.push(format!("#{} [{}] {}", q.id, q.agent, q.question));
    }
    lines.join("\n")
}

async fn step_answer(state: &Arc<AppState>, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: /answer <text>".to_string();
    }
    answer_oldest_pending(state, rest).await
}

/// Shared by `/answer` (§4.1 step 10) and `POST /reply` (§4.3).
pub async fn answer_oldest_pending(state: &Arc<AppState>, answer_text: &str) -> String {
    let Some(answered) = state.pending.answer_oldest(answer_text).await else {
        return "No pending question to answer.".to_string();
    };

    if let Some(task_id) = answered.task_id {
        state
            .tasks
            .append_owner_answer(task_id, answered.id, &answered.question, answer_text)
            .await;
    }

    let ctx = state.dispatch.clone();
    let agent = answered.agent.to_string();
    let question = answered.question.clone();
    let answer = answer_text.to_string();
    tokio::spawn(async move {
        dispatch_followup(&ctx, &agent, &question, &answer).await;
    });

    format!("Answer recorded for question #{}", answered.id)
}

/// §4.1 step 11: gmail/calendar/weather/search/notes/links/briefing/
/// weeklyreview/memory local handlers (SPEC_FULL.md expansion).
async fn step_local_handlers(state: &Arc<AppState>, trimmed: &str) -> Option<String> {
    if let Some(rest) = strip_command(trimmed, "/weather") {
        return Some(info::weather(&state.http, &state.runtime.config.info_tools, rest).await);
    }
    if let Some(rest) = strip_command(trimmed, "/search") {
        return Some(info::search(&state.http, &state.runtime.config.info_tools, rest).await);
    }
    if let Some(rest) = strip_command(trimmed, "/note") {
        return Some(notes::append_note(&state.runtime.paths, rest));
    }
    if let Some(rest) = strip_command(trimmed, "/link") {
        let mut tokens = rest.split_whitespace();
        let url = tokens.next().unwrap_or("");
        let tags: Vec<String> = tokens.map(str::to_string).collect();
        return Some(links::add_link(&state.http, &state.runtime.paths, url, &tags).await);
    }
    if let Some(rest) = strip_command(trimmed, "/recall").or_else(|| strip_command(trimmed, "/memory")) {
        if rest.is_empty() {
            return Some("Usage: /recall <query>".to_string());
        }
        return Some(state.memory.recall(rest, 5).await);
    }
    if strip_command(trimmed, "/briefing").is_some() {
        return Some(briefing::briefing(&state.tasks, &state.google).await);
    }
    if strip_command(trimmed, "/weeklyreview").is_some() {
        return Some(briefing::weekly_review(&state.tasks, &state.runtime.paths.lessons_file()).await);
    }
    if let Some(rest) = strip_command(trimmed, "/gmail") {
        return Some(gmail_text_command(state, rest).await);
    }
    if let Some(rest) = strip_command(trimmed, "/calendar") {
        return Some(calendar_text_command(state, rest).await);
    }
    None
}

async fn gmail_text_command(state: &Arc<AppState>, rest: &str) -> String {
    match rest.trim() {
        "unread" => match state.google.count_unread().await {
            Some(n) => format!("{n} unread message(s)."),
            None => "Gmail is not configured on this host.".to_string(),
        },
        "inbox" | "" => {
            let result = state.google.list_emails("in:inbox", 10).await;
            result
                .get("emails")
                .and_then(|v| v.as_array())
                .map(|emails| format!("Inbox: {} message(s).", emails.len()))
                .unwrap_or_else(|| "Gmail is not configured on this host.".to_string())
        }
        other => format!("Unknown gmail command: {other}"),
    }
}

async fn calendar_text_command(state: &Arc<AppState>, rest: &str) -> String {
    match rest.trim() {
        "today" => {
            let result = state.google.list_events("today").await;
            render_events(&result)
        }
        "week" | "" => {
            let result = state.google.list_events("week").await;
            render_events(&result)
        }
        other => format!("Unknown calendar command: {other}"),
    }
}

fn render_events(result: &serde_json::Value) -> String {
    match result.get("events").and_then(|v| v.as_array()) {
        Some(events) if !events.is_empty() => {
            let mut lines = vec![format!("{} event(s):", events.len())];
            for event in events {
                let summary = event.get("summary").and_then(|v| v.as_str()).unwrap_or("(untitled)");
                let start = event.get("start").and_then(|v| v.as_str()).unwrap_or("");
                lines.push(format!("- {start} {summary}"));
            }
            lines.join("\n")
        }
        Some(_) => "No events.".to_string(),
        None => "Calendar is not configured on this host.".to_string(),
    }
}

/// §4.1 step 12: record conversation + memory, prepend both contexts, and
/// dispatch the planner worker.
async fn step_fallthrough(state: &Arc<AppState>, trimmed: &str) -> String {
    {
        let mut buffer = state.conversation.lock().await;
        buffer.push(Role::User, trimmed);
        let _ = buffer.save(&state.runtime.paths.conversation_buffer_file());
    }

    let memories = state.memory.search(trimmed, 5, 0.3).await;
    let recent = {
        let buffer = state.conversation.lock().await;
        buffer.format_transcript()
    };

    let mut prompt = String::new();
    if !memories.is_empty() {
        prompt.push_str(&openclaw_memory::MemoryStore::format_recall(&memories));
        prompt.push_str("\n\n");
    }
    if !recent.is_empty() {
        prompt.push_str("Recent conversation:\n");
        prompt.push_str(&recent);
        prompt.push_str("\n\n");
    }
    prompt.push_str(trimmed);

    let ctx = state.dispatch.clone();
    let memory = state.memory.clone();
    let user_text = trimmed.to_string();
    let request = prompt.clone();
    tokio::spawn(async move {
        run_plan_pipeline(&ctx, &request).await;
        record_conversation(&memory, &user_text, &preview(&request)).await;
    });

    queued_reply("Queued for planner", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_command_matches_case_insensitive_prefix() {
        assert_eq!(strip_command("/Plan build a thing", "/plan"), Some("build a thing"));
        assert_eq!(strip_command("/plan", "/plan"), Some(""));
        assert_eq!(strip_command("/plannotreally", "/plan"), None);
        assert_eq!(strip_command("/think something", "/plan"), None);
    }

    #[tokio::test]
    async fn parse_project_note_prefers_pipe_separator() {
        let sql = openclaw_sql::PostgresClient::new(&openclaw_core::config::PostgresSection {
            host: "localhost".into(),
            port: "0".into(),
            db: "x".into(),
            user: "x".into(),
            password: "x".into(),
        });
        let tasks = TaskStore::new(sql);
        let result = parse_project_note(&tasks, "myproj|fixed the bug").await;
        assert_eq!(result, Some(("myproj".to_string(), "fixed the bug".to_string())));
    }

    #[tokio::test]
    async fn parse_project_note_colon_requires_no_whitespace_in_project() {
        let sql = openclaw_sql::PostgresClient::new(&openclaw_core::config::PostgresSection {
            host: "localhost".into(),
            port: "0".into(),
            db: "x".into(),
            user: "x".into(),
            password: "x".into(),
        });
        let tasks = TaskStore::new(sql);
        let result = parse_project_note(&tasks, "myproj:fixed it").await;
        assert_eq!(result, Some(("myproj".to_string(), "fixed it".to_string())));
    }
}
