use std::path::PathBuf;

use openclaw_core::paths::Paths;
use tracing::instrument;

use crate::cron;
use crate::error::{Result, SchedulerError};
use crate::identify::{hash6, slugify, unit_name};
use crate::supervisor::Supervisor;
use crate::types::{JobListing, JobMetadata, JobPayload};

const UNIT_PREFIX: &str = "openclaw-job";

/// The job compiler (§4.4): owns the per-user timer directory and the
/// supervisor handle used to activate/list/remove scheduled jobs.
pub struct JobCompiler {
    paths: std::sync::Arc<Paths>,
    supervisor: Supervisor,
    router_port: u16,
}

impl JobCompiler {
    pub fn new(paths: std::sync::Arc<Paths>, router_port: u16) -> Self {
        Self {
            paths,
            supervisor: Supervisor::new(),
            router_port,
        }
    }

    /// `schedule_job(cron, description)` (§4.4 steps 1-5). Returns the new
    /// job's id, or a usage-style error string for a malformed cron
    /// expression (§8 scenario S3 — no files are written in that case).
    #[instrument(skip(self, description))]
    pub async fn schedule_job(
        &self,
        cron_expr: &str,
        description: &str,
        iso_now: &str,
    ) -> std::result::Result<String, String> {
        let fields = cron::parse(cron_expr)
            .ok_or_else(|| "Invalid cron expression.".to_string())?;
        let calendar_spec = cron::translate(&fields);

        let slug = slugify(description);
        let hash = hash6(&slug, iso_now);
        let id = unit_name(UNIT_PREFIX, &slug, &hash);

        self.write_job_files(&id, cron_expr, &calendar_spec, description, iso_now)
            .await
            .map_err(|e| format!("Failed to write job files: {e}"))?;

        let timer_unit = format!("{id}.timer");
        self.supervisor
            .daemon_reload()
            .await
            .map_err(|e| format!("daemon-reload failed: {e}"))?;
        self.supervisor
            .enable_now(&timer_unit)
            .await
            .map_err(|e| format!("Failed to enable timer: {e}"))?;

        Ok(id)
    }

    async fn write_job_files(
        &self,
        id: &str,
        cron_expr: &str,
        calendar_spec: &str,
        description: &str,
        iso_now: &str,
    ) -> Result<()> {
        self.paths
            .ensure_systemd_user_dir()
            .map_err(SchedulerError::Io)?;

        let service_path = self.service_path(id);
        let timer_path = self.timer_path(id);
        let meta_path = self.meta_path(id);
        let payload_path = self.payload_path(id);

        let exec_line = format!(
            "curl -X POST http://127.0.0.1:{}/route -d @{}",
            self.router_port,
            payload_path.display()
        );
        let service_unit = format!(
            "[Unit]\nDescription=openclaw scheduled job: {description}\n\n\
             [Service]\nType=oneshot\nExecStart={exec_line}\n"
        );
        let timer_unit = format!(
            "[Unit]\nDescription=openclaw timer for {id}\n\n\
             [Timer]\nOnCalendar={calendar_spec}\nPersistent=true\n\n\
             [Install]\nWantedBy=timers.target\n"
        );
        let metadata = JobMetadata {
            id: id.to_string(),
            description: description.to_string(),
            cron: cron_expr.to_string(),
            calendar_spec: calendar_spec.to_string(),
            created_at: iso_now.to_string(),
        };
        let payload = JobPayload::for_think(description);

        std::fs::write(&service_path, service_unit)?;
        std::fs::write(&timer_path, timer_unit)?;
        std::fs::write(&meta_path, serde_json::to_string_pretty(&metadata).unwrap_or_default())?;
        std::fs::write(&payload_path, serde_json::to_string_pretty(&payload).unwrap_or_default())?;
        Ok(())
    }

    fn service_path(&self, id: &str) -> PathBuf {
        self.paths.systemd_user_dir.join(format!("{id}.service"))
    }
    fn timer_path(&self, id: &str) -> PathBuf {
        self.paths.systemd_user_dir.join(format!("{id}.timer"))
    }
    fn meta_path(&self, id: &str) -> PathBuf {
        self.paths.systemd_user_dir.join(format!("{id}.meta.json"))
    }
    fn payload_path(&self, id: &str) -> PathBuf {
        self.paths.systemd_user_dir.join(format!("{id}.payload.json"))
    }

    /// `list_jobs()` (§4.4): malformed metadata files are silently skipped.
    #[instrument(skip(self))]
    pub async fn list_jobs(&self) -> Vec<JobListing> {
        let mut listings = Vec::new();
        let Ok(entries) = std::fs::read_dir(&self.paths.systemd_user_dir) else {
            return listings;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(UNIT_PREFIX) || !name.ends_with(".meta.json") {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            let Ok(meta) = serde_json::from_str::<JobMetadata>(&contents) else {
                continue;
            };
            let timer_unit = format!("{}.timer", meta.id);
            let active = self.supervisor.is_active(&timer_unit).await;
            let next_elapse = self.supervisor.next_elapse(&timer_unit).await;
            listings.push(JobListing {
                id: meta.id,
                cron: meta.cron,
                description: meta.description,
                active,
                next_elapse,
            });
        }
        listings.sort_by(|a, b| a.id.cmp(&b.id));
        listings
    }

    /// `delete_job(id|"all")` (§4.4): disables the timer, unlinks all four
    /// files, then reloads the supervisor. Malformed metadata is silently
    /// unlinked on `"all"`, ignored on a targeted delete (since a targeted
    /// id that never parsed a metadata file simply matches no files).
    #[instrument(skip(self))]
    pub async fn delete_job(&self, id_or_all: &str) -> usize {
        let ids = if id_or_all.eq_ignore_ascii_case("all") {
            self.all_job_ids()
        } else {
            vec![id_or_all.to_string()]
        };

        let mut removed = 0;
        for id in &ids {
            let timer_unit = format!("{id}.timer");
            let _ = self.supervisor.disable_now(&timer_unit).await;

            let mut any = false;
            for path in [
                self.service_path(id),
                self.timer_path(id),
                self.meta_path(id),
                self.payload_path(id),
            ] {
                if path.exists() {
                    let _ = std::fs::remove_file(&path);
                    any = true;
                }
            }
            if any {
                removed += 1;
            }
        }

        if !ids.is_empty() {
            let _ = self.supervisor.daemon_reload().await;
        }
        removed
    }

    fn all_job_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        let Ok(entries) = std::fs::read_dir(&self.paths.systemd_user_dir) else {
            return ids;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(base) = name.strip_suffix(".meta.json") {
                if base.starts_with(UNIT_PREFIX) {
                    ids.push(base.to_string());
                }
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler_in(dir: &std::path::Path) -> JobCompiler {
        JobCompiler::new(std::sync::Arc::new(Paths::from_home(dir)), 18801)
    }

    #[tokio::test]
    async fn schedule_job_with_invalid_cron_writes_no_files() {
        let dir = std::env::temp_dir().join("openclaw-scheduler-test-invalid");
        let _ = std::fs::remove_dir_all(&dir);
        let compiler = compiler_in(&dir);

        let result = compiler
            .schedule_job("0 25 * * *", "bad job", "2024-01-01T00:00:00Z")
            .await;
        assert_eq!(result, Err("Invalid cron expression.".to_string()));
        assert!(!dir.join(".config/systemd/user").exists() || {
            std::fs::read_dir(dir.join(".config/systemd/user"))
                .map(|mut d| d.next().is_none())
                .unwrap_or(true)
        });

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn job_listing_sorted_is_deterministic() {
        let mut listings = vec![
            JobListing {
                id: "b".to_string(),
                cron: "".to_string(),
                description: "".to_string(),
                active: true,
                next_elapse: None,
            },
            JobListing {
                id: "a".to_string(),
                cron: "".to_string(),
                description: "".to_string(),
                active: false,
                next_elapse: None,
            },
        ];
        listings.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(listings[0].id, "a");
    }
}
