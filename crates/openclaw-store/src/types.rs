use std::fmt;
use std::str::FromStr;

/// Status of a row in the external `autonomous_tasks` table (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Todo,
    InProgress,
    ReadyForTesting,
    Blocked,
    Complete,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::ReadyForTesting => "READY_FOR_TESTING",
            Self::Blocked => "BLOCKED",
            Self::Complete => "COMPLETE",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "READY_FOR_TESTING" => Ok(Self::ReadyForTesting),
            "BLOCKED" => Ok(Self::Blocked),
            "COMPLETE" => Ok(Self::Complete),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// Accepted `/unblock` status aliases (§4.6), resolved to a canonical
/// [`TaskStatus`]. Case/punctuation-insensitive.
pub fn parse_unblock_status_alias(token: &str) -> Option<TaskStatus> {
    match token.to_lowercase().as_str() {
        "todo" => Some(TaskStatus::Todo),
        "ready" | "ready_for_testing" | "ready-for-testing" | "ready for testing" => {
            Some(TaskStatus::ReadyForTesting)
        }
        "in_progress" | "in-progress" | "inprogress" => Some(TaskStatus::InProgress),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetail {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub phase: String,
    pub assigned_agent: String,
    pub blocked_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedTask {
    pub id: i64,
    pub name: String,
    pub reason: String,
}

/// A row from the `/todo`, `/inprogress`, `/readyfortesting` listings
/// (§4.6): lighter than [`TaskDetail`] since those views only ever show
/// id, name and phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub id: i64,
    pub name: String,
    pub phase: String,
}

/// Agent roles an owner question/answer may target (§6.3 argv, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Planner,
    Coder,
    Tester,
}

impl Agent {
    pub const ALL: [Agent; 3] = [Agent::Planner, Agent::Coder, Agent::Tester];
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Planner => "planner",
            Self::Coder => "coder",
            Self::Tester => "tester",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Agent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planner" => Ok(Self::Planner),
            "coder" => Ok(Self::Coder),
            "tester" => Ok(Self::Tester),
            other => Err(format!("unknown agent: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Pending,
    Answered,
    Expired,
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Answered => "answered",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub id: i64,
    pub agent: Agent,
    pub task_id: Option<i64>,
    pub question: String,
    pub answer: Option<String>,
    pub status: QuestionStatus,
    pub created_at: String,
    pub answered_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unblock_alias_matches_spec_table() {
        assert_eq!(parse_unblock_status_alias("todo"), Some(TaskStatus::Todo));
        assert_eq!(
            parse_unblock_status_alias("ready_for_testing"),
            Some(TaskStatus::ReadyForTesting)
        );
        assert_eq!(
            parse_unblock_status_alias("ready-for-testing"),
            Some(TaskStatus::ReadyForTesting)
        );
        assert_eq!(
            parse_unblock_status_alias("ready for testing"),
            Some(TaskStatus::ReadyForTesting)
        );
        assert_eq!(
            parse_unblock_status_alias("in-progress"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(parse_unblock_status_alias("bogus"), None);
    }

    #[test]
    fn agent_from_str_roundtrips_display() {
        for agent in Agent::ALL {
            assert_eq!(agent.to_string().parse::<Agent>().unwrap(), agent);
        }
    }
}
