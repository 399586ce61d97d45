use std::sync::Arc;

use openclaw_core::config::{AgentCliSection, RouterSection};
use openclaw_core::paths::Paths;
use openclaw_core::text::preview;
use openclaw_memory::MemoryStore;
use tracing::{info, instrument, warn};

use crate::cmd::{agent_cmd, run_agent};
use crate::json::{extract_json_payload, normalize_think_output};
use crate::notify::{send_owner_message, OwnerNotifier};
use crate::prompts::{
    build_adhoc_prompt, build_ask_prompt, build_followup_prompt, build_planner_prompt,
    build_think_prompt,
};

const PLAN_TIMEOUT_SEC: u64 = 1200;
const MAX_REPLY_CHARS: usize = 3500;

/// Shared context every pipeline needs: filesystem layout, the agent CLI
/// section, an owner-notification sink, and (for the plan pipeline) the
/// task store it hands extracted JSON off to.
#[derive(Clone)]
pub struct DispatchContext {
    pub paths: Arc<Paths>,
    pub agent_cli: AgentCliSection,
    pub router: RouterSection,
    pub notifier: Arc<dyn OwnerNotifier>,
}

fn truncate_for_owner(text: &str) -> String {
    if text.chars().count() > MAX_REPLY_CHARS {
        let truncated: String = text.chars().take(MAX_REPLY_CHARS).collect();
        format!("{truncated}\n...<truncated>")
    } else {
        text.to_string()
    }
}

/// Append a dispatch-log entry (§4.2 plan/think pipelines write to
/// `chat-router-{planner,think}.log`).
fn append_log(path: &std::path::Path, header: &str, request: &str, body: &str) {
    use std::io::Write;
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "\n=== {header} ===");
    let _ = writeln!(file, "Request: {request}");
    let _ = writeln!(file, "---");
    if !body.is_empty() {
        let _ = writeln!(file, "{body}");
    }
}

/// Plan pipeline (§4.2): spawn the planner, extract its JSON payload, pipe
/// it to the add-tasks script, then fire-and-forget the task manager.
#[instrument(skip(ctx, text))]
pub async fn run_plan_pipeline(ctx: &DispatchContext, text: &str) {
    let prompt = build_planner_prompt(text, &ctx.paths);
    let argv = agent_cmd(&ctx.agent_cli, "planner", &prompt, PLAN_TIMEOUT_SEC);
    let log_path = ctx.paths.planner_log_file();

    let output = match run_agent("planner", &argv, PLAN_TIMEOUT_SEC).await {
        Ok(output) => output,
        Err(e) => {
            append_log(&log_path, "Planner dispatch", text, &e.to_string());
            warn!("plan pipeline failed: {e}");
            return;
        }
    };
    let combined = output.combined();
    append_log(&log_path, "Planner dispatch", text, &combined);

    let Some(payload) = extract_json_payload(&combined) else {
        append_log(&log_path, "Planner dispatch", text, "Planner output did not include JSON payload.");
        return;
    };

    let add_tasks_result = run_pipe_script(&ctx.paths.add_tasks_script(), payload).await;
    match add_tasks_result {
        Ok(output) if output.exit_code == 0 => {
            append_log(&log_path, "Planner dispatch", text, &output.combined());
        }
        Ok(output) => {
            append_log(&log_path, "Planner dispatch", text, "add-tasks-to-db.sh failed.");
            append_log(&log_path, "Planner dispatch", text, &output.combined());
            return;
        }
        Err(e) => {
            append_log(&log_path, "Planner dispatch", text, &format!("add-tasks-to-db.sh spawn failed: {e}"));
            return;
        }
    }

    let task_manager = ctx.paths.task_manager_script();
    if let Err(e) = tokio::process::Command::new(&task_manager).spawn() {
        warn!("failed to start task manager: {e}");
    } else {
        info!("task manager started (fire-and-forget)");
    }
}

async fn run_pipe_script(
    script: &std::path::Path,
    stdin_payload: &str,
) -> std::io::Result<crate::cmd::AgentOutput> {
    use std::process::Stdio;
    use tokio::io::AsyncWriteExt;

    let mut child = tokio::process::Command::new(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(stdin_payload.as_bytes()).await;
    }

    let output = child.wait_with_output().await?;
    Ok(crate::cmd::AgentOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Think pipeline (§4.2): optimize the request, then tail-call plan.
#[instrument(skip(ctx, text))]
pub async fn run_think_pipeline(ctx: &DispatchContext, text: &str) {
    let optimized = match optimize_with_think(ctx, text).await {
        Some(o) => o,
        None => return,
    };
    run_plan_pipeline(ctx, &optimized).await;
}

async fn optimize_with_think(ctx: &DispatchContext, text: &str) -> Option<String> {
    let prompt = build_think_prompt(text);
    let argv = agent_cmd(&ctx.agent_cli, "planner", &prompt, PLAN_TIMEOUT_SEC);
    let log_path = ctx.paths.think_log_file();

    let think_timeout_sec = ctx.router.think_timeout_sec;
    let output = match run_agent("planner", &argv, think_timeout_sec).await {
        Ok(o) => o,
        Err(e) => {
            append_log(&log_path, "Think dispatch", text, &e.to_string());
            return None;
        }
    };
    append_log(&log_path, "Think dispatch", text, &output.combined());

    let optimized = normalize_think_output(if output.stdout.trim().is_empty() {
        &output.combined()
    } else {
        &output.stdout
    });
    if optimized.is_empty() {
        None
    } else {
        Some(optimized)
    }
}

/// Prompt-dry pipeline (§4.2): like think, but deliver the optimized text
/// to the owner instead of continuing into plan.
#[instrument(skip(ctx, text))]
pub async fn run_prompt_dry_pipeline(ctx: &DispatchContext, text: &str) {
    let optimized = match optimize_with_think(ctx, text).await {
        Some(o) => o,
        None => {
            let _ = send_owner_message(
                ctx.notifier.as_ref(),
                "planner",
                text,
                "No optimized prompt was produced.",
            )
            .await;
            return;
        }
    };
    let truncated = truncate_for_owner(&optimized);
    let _ = send_owner_message(ctx.notifier.as_ref(), "planner", text, &truncated).await;
}

/// Ask pipeline (§4.2): "answer only" prompt, no task-table mutation.
#[instrument(skip(ctx, question))]
pub async fn run_ask_pipeline(ctx: &DispatchContext, agent: &str, question: &str) {
    let prompt = build_ask_prompt(agent, question);
    let argv = agent_cmd(&ctx.agent_cli, agent, &prompt, PLAN_TIMEOUT_SEC);

    let answer = match run_agent(agent, &argv, ctx.router.ask_timeout_sec).await {
        Ok(output) => {
            let text = output.stdout.trim();
            if text.is_empty() {
                let combined = output.combined();
                if combined.is_empty() {
                    format!("Agent {agent} completed without output.")
                } else {
                    combined
                }
            } else {
                text.to_string()
            }
        }
        Err(e) => format!("Agent {agent} failed: {e}"),
    };

    let truncated = truncate_for_owner(&answer);
    let _ = send_owner_message(ctx.notifier.as_ref(), agent, question, &truncated).await;
}

/// Adhoc pipeline (§4.2): like ask but defaults to coder, longer timeout,
/// explicitly forbids task-table writes.
#[instrument(skip(ctx, instruction))]
pub async fn run_adhoc_pipeline(ctx: &DispatchContext, instruction: &str, timeout_sec: u64) {
    let agent = "coder";
    let prompt = build_adhoc_prompt(instruction);
    let argv = agent_cmd(&ctx.agent_cli, agent, &prompt, timeout_sec);

    let result = match run_agent(agent, &argv, timeout_sec).await {
        Ok(output) => output.combined(),
        Err(e) => format!("Agent {agent} failed: {e}"),
    };

    let truncated = truncate_for_owner(&result);
    let _ = send_owner_message(ctx.notifier.as_ref(), agent, instruction, &truncated).await;
}

/// Dispatch the follow-up prompt after an owner answers a pending question
/// (§4.3 step 5): planner originators re-enter the plan pipeline, everyone
/// else gets the adhoc pipeline.
#[instrument(skip(ctx, question, answer))]
pub async fn dispatch_followup(
    ctx: &DispatchContext,
    originating_agent: &str,
    question: &str,
    answer: &str,
) {
    let followup = build_followup_prompt(question, answer);
    if originating_agent.eq_ignore_ascii_case("planner") {
        run_plan_pipeline(ctx, &followup).await;
    } else {
        run_adhoc_pipeline(ctx, &followup, ctx.router.adhoc_timeout_sec).await;
    }
}

/// Acknowledgement string returned synchronously to the HTTP caller when a
/// pipeline has been queued (§4.1 classification steps 1-3).
pub fn queued_reply(label: &str, text: &str) -> String {
    format!("{label}: {}", preview(text))
}

/// Record a memory hit against a store, ignoring failures — used wherever
/// the router stores conversational context alongside dispatch (§4.1 step
/// 12 and §4.2 plan pipeline context building).
pub async fn record_conversation(memory: &MemoryStore, user_text: &str, reply: &str) {
    let _ = memory.store_conversation(user_text, reply).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_for_owner_leaves_short_text_unchanged() {
        assert_eq!(truncate_for_owner("short"), "short");
    }

    #[test]
    fn truncate_for_owner_truncates_long_text_with_suffix() {
        let long = "x".repeat(4000);
        let truncated = truncate_for_owner(&long);
        assert!(truncated.ends_with("...<truncated>"));
        assert!(truncated.len() < long.len());
    }

    #[test]
    fn queued_reply_prefixes_label() {
        let out = queued_reply("Queued for planner", "build me a thing");
        assert!(out.starts_with("Queued for planner: "));
    }
}
