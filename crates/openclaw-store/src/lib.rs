//! `openclaw-store` — read-mostly task-table access and the question–answer
//! rendezvous (§3, §4.3, §4.6), both backed by `openclaw-sql`.

pub mod pending;
pub mod tasks;
pub mod types;

pub use pending::PendingQuestionStore;
pub use tasks::TaskStore;
pub use types::{Agent, BlockedTask, PendingQuestion, QuestionStatus, TaskDetail, TaskStatus, TaskSummary};
