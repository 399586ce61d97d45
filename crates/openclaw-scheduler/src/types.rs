use serde::{Deserialize, Serialize};

/// Metadata JSON written alongside each job's service/timer units (§4.4
/// step 4, §6.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMetadata {
    pub id: String,
    pub description: String,
    pub cron: String,
    pub calendar_spec: String,
    pub created_at: String,
}

/// Payload JSON delivered to `/route` when the timer fires (§4.4 step 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    pub text: String,
}

impl JobPayload {
    pub fn for_think(description: &str) -> Self {
        Self {
            text: format!("/think {description}"),
        }
    }
}

/// A listed job (§4.4 `list_jobs`): metadata plus live supervisor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub id: String,
    pub cron: String,
    pub description: String,
    pub active: bool,
    pub next_elapse: Option<String>,
}

impl JobListing {
    pub fn format(&self) -> String {
        let status = if self.active { "active" } else { "inactive" };
        let next = self.next_elapse.as_deref().unwrap_or("unknown");
        format!(
            "{} [{status}] Cron=\"{}\" Next={next} — {}",
            self.id, self.cron, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_payload_for_think_wraps_description() {
        let p = JobPayload::for_think("morning report");
        assert_eq!(p.text, "/think morning report");
    }

    #[test]
    fn job_listing_format_shows_status_and_cron() {
        let listing = JobListing {
            id: "openclaw-job-morning-report-ab12cd".to_string(),
            cron: "0 7 * * *".to_string(),
            description: "morning report".to_string(),
            active: true,
            next_elapse: Some("2024-01-02 07:00:00".to_string()),
        };
        let out = listing.format();
        assert!(out.contains("[active]"));
        assert!(out.contains("Cron=\"0 7 * * *\""));
    }
}
