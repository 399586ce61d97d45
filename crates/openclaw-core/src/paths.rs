use std::path::PathBuf;

/// Filesystem layout anchors (§6.7), rooted at the process owner's home
/// directory. Resolved once and carried on [`crate::runtime::Runtime`] so no
/// component recomputes `$HOME` lookups at call time.
#[derive(Debug, Clone)]
pub struct Paths {
    pub workspace_dir: PathBuf,
    pub agent_context_dir: PathBuf,
    pub projects_dir: PathBuf,
    pub notes_dir: PathBuf,
    pub inbox_dir: PathBuf,
    pub systemd_user_dir: PathBuf,
}

impl Paths {
    pub fn from_home(home: &std::path::Path) -> Self {
        let workspace_dir = home.join(".openclaw").join("workspace");
        Self {
            agent_context_dir: workspace_dir.join("agent-context"),
            projects_dir: workspace_dir.join("agent-context").join("projects"),
            notes_dir: workspace_dir.join("notes"),
            inbox_dir: workspace_dir.join("inbox"),
            systemd_user_dir: home.join(".config").join("systemd").join("user"),
            workspace_dir,
        }
    }

    pub fn discover() -> Self {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_home(&home)
    }

    pub fn lessons_file(&self) -> PathBuf {
        self.agent_context_dir.join("lessons.log")
    }

    pub fn bookmarks_file(&self) -> PathBuf {
        self.agent_context_dir.join("bookmarks.json")
    }

    pub fn links_file(&self) -> PathBuf {
        self.agent_context_dir.join("links.json")
    }

    pub fn conversation_buffer_file(&self) -> PathBuf {
        self.workspace_dir.join(".conversation-buffer.json")
    }

    pub fn telegram_offset_file(&self) -> PathBuf {
        self.workspace_dir.join(".telegram-offset")
    }

    pub fn planner_log_file(&self) -> PathBuf {
        self.workspace_dir.join("chat-router-planner.log")
    }

    pub fn think_log_file(&self) -> PathBuf {
        self.workspace_dir.join("chat-router-think.log")
    }

    /// External script invoked with the planner's extracted JSON payload on
    /// stdin (§4.2 plan pipeline).
    pub fn add_tasks_script(&self) -> PathBuf {
        self.workspace_dir.join("add-tasks-to-db.sh")
    }

    /// External task-manager script, started fire-and-forget once tasks are
    /// added (§4.2 plan pipeline).
    pub fn task_manager_script(&self) -> PathBuf {
        self.workspace_dir.join("autonomous-task-manager-db.sh")
    }

    /// Google Gmail/Calendar collaborator script (§4.1 item 11, §6.4):
    /// invoked as a subprocess, never imported in-process, per the
    /// deliberate-exclusion boundary in §1.
    pub fn google_services_script(&self) -> PathBuf {
        self.workspace_dir.join("google-services.py")
    }

    pub fn project_file(&self, sanitized_project: &str) -> PathBuf {
        self.projects_dir.join(format!("{sanitized_project}.log"))
    }

    pub fn note_file(&self, date: &str) -> PathBuf {
        self.notes_dir.join(format!("{date}.md"))
    }

    pub fn ensure_context_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.agent_context_dir)?;
        std::fs::create_dir_all(&self.projects_dir)?;
        Ok(())
    }

    pub fn ensure_notes_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.notes_dir)
    }

    pub fn ensure_inbox_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.inbox_dir)
    }

    pub fn ensure_systemd_user_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.systemd_user_dir)
    }
}
