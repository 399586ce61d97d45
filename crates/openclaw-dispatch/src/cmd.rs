use std::time::Duration;

use openclaw_core::config::{agent_temperature, AgentCliSection};
use tracing::{instrument, warn};

use crate::error::{DispatchError, Result};
use crate::thinking::thinking_from_temp;

/// Output of a completed (or timed-out) agent invocation.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl AgentOutput {
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// Build the argv for the external agent CLI (§4.2 `agent_cmd` primitive).
pub fn agent_cmd(cli: &AgentCliSection, agent: &str, message: &str, timeout_sec: u64) -> Vec<String> {
    let normalized = agent.trim().to_lowercase();
    let thinking = thinking_from_temp(agent_temperature(&normalized));
    let mut argv = vec![cli.node.clone()];
    if let Some(path) = &cli.cli_path {
        argv.push(path.clone());
    }
    argv.extend([
        "agent".to_string(),
        "--agent".to_string(),
        normalized,
        "--message".to_string(),
        message.to_string(),
        "--timeout".to_string(),
        timeout_sec.to_string(),
        "--thinking".to_string(),
        thinking.to_string(),
    ]);
    argv
}

/// Spawn the agent argv built by [`agent_cmd`], enforcing `timeout_sec`
/// out-of-band via the same spawn/oneshot/timeout/SIGKILL pattern used for
/// every other long-running subprocess in this workspace.
#[instrument(skip(argv), fields(agent = %agent))]
pub async fn run_agent(agent: &str, argv: &[String], timeout_sec: u64) -> Result<AgentOutput> {
    let (program, rest) = argv.split_first().expect("agent_cmd always returns argv");
    let child = tokio::process::Command::new(program)
        .args(rest)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()?;

    let pid = child.id();
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(child.wait_with_output().await);
    });

    match tokio::time::timeout(Duration::from_secs(timeout_sec), rx).await {
        Ok(Ok(Ok(output))) => Ok(AgentOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Ok(Err(e))) => Err(DispatchError::Spawn(e)),
        Ok(Err(_)) => Err(DispatchError::WaitTaskFailed {
            agent: agent.to_string(),
        }),
        Err(_) => {
            if let Some(raw_pid) = pid {
                kill_pid(raw_pid);
            }
            warn!("agent {agent} timed out after {timeout_sec}s");
            Err(DispatchError::Timeout {
                agent: agent.to_string(),
                ms: timeout_sec * 1_000,
            })
        }
    }
}

#[cfg(unix)]
fn kill_pid(pid: u32) {
    unsafe {
        libc::kill(pid as libc::pid_t, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_pid(pid: u32) {
    let _ = std::process::Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .output();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> AgentCliSection {
        AgentCliSection {
            node: "/usr/bin/node".to_string(),
            cli_path: Some("/opt/openclaw/cli.js".to_string()),
        }
    }

    #[test]
    fn agent_cmd_includes_flags_in_order() {
        let argv = agent_cmd(&cli(), "Planner", "do the thing", 120);
        assert_eq!(argv[0], "/usr/bin/node");
        assert_eq!(argv[1], "/opt/openclaw/cli.js");
        assert_eq!(argv[2], "agent");
        assert_eq!(argv[3], "--agent");
        assert_eq!(argv[4], "planner");
        assert_eq!(argv[5], "--message");
        assert_eq!(argv[6], "do the thing");
        assert_eq!(argv[7], "--timeout");
        assert_eq!(argv[8], "120");
        assert_eq!(argv[9], "--thinking");
    }

    #[test]
    fn agent_cmd_omits_cli_path_when_unset() {
        let cli = AgentCliSection {
            node: "/usr/bin/node".to_string(),
            cli_path: None,
        };
        let argv = agent_cmd(&cli, "coder", "x", 60);
        assert_eq!(argv[1], "agent");
    }
}
