//! `openclaw-scheduler` — the job compiler (§4.4): parses and translates
//! cron expressions into systemd calendar specs, writes the four unit
//! files per job, and drives `systemctl --user` to activate/list/remove
//! them.

pub mod cron;
pub mod error;
pub mod identify;
pub mod job;
pub mod supervisor;
pub mod types;

pub use error::{Result, SchedulerError};
pub use job::JobCompiler;
pub use types::{JobListing, JobMetadata, JobPayload};
