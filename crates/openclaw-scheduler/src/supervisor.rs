use tracing::{instrument, warn};

/// Thin wrapper over `systemctl --user` (§6.5 host timer supervisor).
#[derive(Debug, Clone, Default)]
pub struct Supervisor;

impl Supervisor {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self))]
    pub async fn daemon_reload(&self) -> Result<(), String> {
        self.run(&["--user", "daemon-reload"]).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn enable_now(&self, timer_unit: &str) -> Result<(), String> {
        self.run(&["--user", "enable", "--now", timer_unit])
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn disable_now(&self, timer_unit: &str) -> Result<(), String> {
        self.run(&["--user", "disable", "--now", timer_unit])
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn is_active(&self, timer_unit: &str) -> bool {
        matches!(
            self.run(&["--user", "is-active", timer_unit]).await,
            Ok(out) if out.trim() == "active"
        )
    }

    #[instrument(skip(self))]
    pub async fn next_elapse(&self, timer_unit: &str) -> Option<String> {
        let out = self
            .run(&[
                "--user",
                "show",
                timer_unit,
                "--property=NextElapseUSecRealtime",
                "--value",
            ])
            .await
            .ok()?;
        let trimmed = out.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = tokio::process::Command::new("systemctl")
            .args(args)
            .output()
            .await
            .map_err(|e| e.to_string())?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!("systemctl {:?} failed: {stderr}", args);
            return Err(stderr);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
