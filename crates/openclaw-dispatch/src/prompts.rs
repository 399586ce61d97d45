use openclaw_core::paths::Paths;

/// Last-10-lessons suffix appended to the planner prompt (§4.2).
pub fn planner_context_suffix(paths: &Paths) -> String {
    let lessons = read_recent_lines(&paths.lessons_file(), 10);
    if lessons.is_empty() {
        return String::new();
    }
    let mut lines = vec![
        String::new(),
        "Global lessons learned (apply unless repo state contradicts):".to_string(),
    ];
    lines.extend(lessons.iter().map(|l| format!("- {l}")));
    lines.push(String::new());
    lines.join("\n")
}

fn read_recent_lines(path: &std::path::Path, count: usize) -> Vec<String> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if lines.len() > count {
        lines = lines.split_off(lines.len() - count);
    }
    lines
}

/// Build the planner's task-JSON-only prompt (§4.2 plan pipeline).
pub fn build_planner_prompt(text: &str, paths: &Paths) -> String {
    format!(
        "You are the planner. Convert the request into task JSON only.\n\
         - Identify the target repo and inspect its current state before planning.\n\
         - Base phases only on what is verifiably present right now.\n\
         - Do not claim work is already done unless directly verified from repo artifacts.\n\
         - If partial implementation exists, add explicit verify/fix tasks instead of skipping phases.\n\n\
         User request: {text}\n\
         {}",
        planner_context_suffix(paths)
    )
}

/// Build the think pipeline's optimization prompt (§4.2 think pipeline).
pub fn build_think_prompt(text: &str) -> String {
    format!(
        "You are optimizing a build request before planning.\n\
         Rewrite the user request into a clearer, execution-ready planning brief.\n\
         Keep original intent and scope; do not add extra features.\n\
         Include concrete constraints, edge cases, and verification expectations when implied.\n\
         Output plain text only (no markdown, no JSON, no commentary).\n\n\
         User request: {text}\n"
    )
}

/// Build the ask pipeline's answer-only prompt (§4.2 ask pipeline): no
/// task-table mutations allowed, output the answer text only.
pub fn build_ask_prompt(agent: &str, question: &str) -> String {
    format!(
        "You are responding to an owner question asynchronously.\n\
         Agent role: {agent}\n\
         Owner question: {question}\n\n\
         Required behavior:\n\
         1) Determine the best answer to the question.\n\
         2) Return only the final answer text in your output.\n\
         3) Do not call message tools or any external channel APIs.\n\
         4) Do not include routing metadata, only the answer content."
    )
}

/// Build the adhoc pipeline's prompt: like [`build_ask_prompt`] but
/// explicit that no task-table writes are permitted (§4.2 adhoc pipeline).
pub fn build_adhoc_prompt(instruction: &str) -> String {
    format!(
        "You are executing an ad-hoc instruction outside the task pipeline.\n\
         Instruction: {instruction}\n\n\
         Required behavior:\n\
         1) Do not create, update, or delete any rows in the task table.\n\
         2) Return only the result text in your output."
    )
}

/// Build the follow-up prompt dispatched after an owner answers a pending
/// question (§4.3): embeds both the original question and the answer.
pub fn build_followup_prompt(question: &str, answer: &str) -> String {
    format!(
        "The owner has answered a question you asked earlier.\n\
         Original question: {question}\n\
         Owner answer: {answer}\n\n\
         Continue the task using this answer."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn planner_context_suffix_empty_when_no_lessons_file() {
        let paths = Paths::from_home(std::path::Path::new("/nonexistent-home"));
        assert_eq!(planner_context_suffix(&paths), "");
    }

    #[test]
    fn planner_context_suffix_lists_last_n_lessons() {
        let dir = std::env::temp_dir().join("openclaw-dispatch-test-lessons");
        std::fs::create_dir_all(&dir).unwrap();
        let paths = Paths::from_home(&dir);
        paths.ensure_context_dirs().unwrap();
        let mut f = std::fs::File::create(paths.lessons_file()).unwrap();
        for i in 0..15 {
            writeln!(f, "lesson {i}").unwrap();
        }
        drop(f);

        let suffix = planner_context_suffix(&paths);
        assert!(suffix.contains("lesson 14"));
        assert!(!suffix.contains("lesson 3\n") && !suffix.contains("- lesson 3"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn build_ask_prompt_forbids_tool_calls() {
        let p = build_ask_prompt("planner", "what port?");
        assert!(p.contains("Do not call message tools"));
    }
}
