use std::time::Duration;

use openclaw_core::config::PostgresSection;
use tracing::{debug, warn};

use crate::error::{Result, SqlError};

/// ASCII unit separator — used as the output field delimiter so arbitrary
/// memory content (which may contain `|` or newlines) parses unambiguously.
pub const FIELD_SEP: char = '\u{1f}';

const QUERY_TIMEOUT_SEC: u64 = 30;

/// Stateless invocation of the external `psql`-compatible CLI client.
///
/// §9's Design Notes direct re-implementers to use parameter binding, but
/// §4.5/§6.6 and §8's testable properties describe the literal CLI
/// transport (single-quote-doubling escape, 0x1F-delimited output) in
/// enough concrete detail that this workspace implements that transport
/// directly rather than swapping in a native driver crate — see
/// DESIGN.md for the full resolution of this tension.
#[derive(Debug, Clone)]
pub struct PostgresClient {
    host: String,
    port: String,
    db: String,
    user: String,
    password: String,
}

impl PostgresClient {
    pub fn new(section: &PostgresSection) -> Self {
        Self {
            host: section.host.clone(),
            port: section.port.clone(),
            db: section.db.clone(),
            user: section.user.clone(),
            password: section.password.clone(),
        }
    }

    /// Run `query` via `psql -t -A -F <0x1F> -c <query>` and return trimmed
    /// stdout. A non-zero exit or timeout yields an empty string — callers
    /// that expect a row treat empty output as "not found" (§7).
    pub async fn run_query(&self, query: &str) -> String {
        match self.run_query_timed(query, QUERY_TIMEOUT_SEC).await {
            Ok(out) => out,
            Err(e) => {
                warn!(error = %e, "sql adapter: query failed");
                String::new()
            }
        }
    }

    async fn run_query_timed(&self, query: &str, timeout_secs: u64) -> Result<String> {
        let sep = FIELD_SEP.to_string();
        let mut cmd = tokio::process::Command::new("psql");
        cmd.arg("-h")
            .arg(&self.host)
            .arg("-p")
            .arg(&self.port)
            .arg("-U")
            .arg(&self.user)
            .arg("-d")
            .arg(&self.db)
            .arg("-t")
            .arg("-A")
            .arg("-F")
            .arg(&sep)
            .arg("-c")
            .arg(query)
            .env("PGPASSWORD", &self.password)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        debug!(query_len = query.len(), "sql adapter: running psql");

        let mut child = cmd.spawn().map_err(SqlError::Spawn)?;
        let pid = child.id();

        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let result = child.wait_with_output().await;
            let _ = tx.send(result);
        });

        match tokio::time::timeout(Duration::from_secs(timeout_secs), rx).await {
            Ok(Ok(Ok(output))) => {
                if !output.status.success() {
                    return Ok(String::new());
                }
                Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(Ok(Err(_io))) => Ok(String::new()),
            Ok(Err(_)) => Err(SqlError::WaitTaskFailed),
            Err(_elapsed) => {
                if let Some(pid) = pid {
                    kill_pid(pid);
                }
                Err(SqlError::Timeout {
                    ms: timeout_secs * 1000,
                })
            }
        }
    }
}

#[cfg(unix)]
fn kill_pid(pid: u32) {
    unsafe {
        libc::kill(pid as i32, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_pid(pid: u32) {
    let _ = std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .status();
}

/// Escape a string for inline SQL literal insertion by doubling single
/// quotes — the convention the row-parsing/translation properties in §8
/// are specified against.
pub fn escape_sql_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Format an embedding vector as a pgvector literal: `[v1,v2,...]::vector`.
pub fn format_vector_literal(vec: &[f32]) -> String {
    let joined = vec
        .iter()
        .map(|v| format!("{v:.8}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("[{joined}]::vector")
}

/// Split psql's `-F 0x1F` output into rows of fields.
pub fn parse_rows(output: &str) -> Vec<Vec<String>> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.split(FIELD_SEP).map(|f| f.to_string()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_doubles_single_quotes() {
        assert_eq!(escape_sql_literal("it's a test"), "it''s a test");
        assert_eq!(escape_sql_literal("plain"), "plain");
    }

    #[test]
    fn format_vector_literal_shape() {
        let lit = format_vector_literal(&[0.5, -0.25]);
        assert!(lit.starts_with('['));
        assert!(lit.ends_with("::vector"));
        assert!(lit.contains("0.50000000"));
    }

    #[test]
    fn parse_rows_splits_on_unit_separator() {
        let input = format!("1{}alice{}42\n2{}bob{}7", FIELD_SEP, FIELD_SEP, FIELD_SEP, FIELD_SEP);
        let rows = parse_rows(&input);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "alice", "42"]);
        assert_eq!(rows[1], vec!["2", "bob", "7"]);
    }

    #[test]
    fn parse_rows_skips_blank_lines() {
        let rows = parse_rows("\n\n");
        assert!(rows.is_empty());
    }
}
