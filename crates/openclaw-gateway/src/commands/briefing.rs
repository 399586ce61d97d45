//! `/briefing` and `/weeklyreview` aggregators (SPEC_FULL.md §4.1 item 11
//! expansion).

use openclaw_store::TaskStore;

use crate::google::GoogleServices;

/// Task counts, blocked-task count, today's calendar events (if
/// configured), unread email count (if configured).
pub async fn briefing(tasks: &TaskStore, google: &GoogleServices) -> String {
    let (todo, in_progress, ready) = tasks.counts().await;
    let blocked = tasks.list_blocked(1000).await.len();

    let mut lines = vec![
        "Daily briefing:".to_string(),
        format!("Tasks: TODO={todo}, IN_PROGRESS={in_progress}, READY_FOR_TESTING={ready}, BLOCKED={blocked}"),
    ];

    match google.count_unread().await {
        Some(count) => lines.push(format!("Unread email: {count}")),
        None => lines.push("Unread email: not configured".to_string()),
    }

    let events = google.list_events("today").await;
    match events.get("events").and_then(|v| v.as_array()) {
        Some(events) if !events.is_empty() => {
            lines.push(format!("Calendar today: {} event(s)", events.len()));
        }
        Some(_) => lines.push("Calendar today: no events".to_string()),
        None => lines.push("Calendar today: not configured".to_string()),
    }

    lines.join("\n")
}

/// Tasks completed and lessons logged in the last 7 days.
pub async fn weekly_review(tasks: &TaskStore, lessons_file: &std::path::Path) -> String {
    const WINDOW_DAYS: i64 = 7;
    let completed = tasks.completed_since(WINDOW_DAYS).await;
    let lessons = count_recent_lessons(lessons_file, WINDOW_DAYS);
    format!(
        "Weekly review (last {WINDOW_DAYS} days): {completed} task(s) completed, {lessons} lesson(s) logged."
    )
}

/// Lessons are appended as `[YYYY-MM-DD HH:MM:SS UTC] <text>` (grounded in
/// the original chat router's `add_lesson`); count lines whose timestamp
/// falls within the last `days` days.
fn count_recent_lessons(path: &std::path::Path, days: i64) -> usize {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return 0;
    };
    let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
    contents
        .lines()
        .filter(|line| {
            line.strip_prefix('[')
                .and_then(|rest| rest.split(']').next())
                .and_then(|stamp| {
                    chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S UTC").ok()
                })
                .map(|naive| naive.and_utc() >= cutoff)
                .unwrap_or(false)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn count_recent_lessons_filters_by_window() {
        let dir = std::env::temp_dir().join("openclaw-gateway-test-lessons");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("lessons.log");
        let mut file = std::fs::File::create(&path).unwrap();
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        writeln!(file, "[{now}] recent lesson").unwrap();
        writeln!(file, "[2000-01-01 00:00:00 UTC] ancient lesson").unwrap();
        drop(file);

        assert_eq!(count_recent_lessons(&path, 7), 1);

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn count_recent_lessons_empty_when_file_missing() {
        assert_eq!(count_recent_lessons(std::path::Path::new("/nonexistent/lessons.log"), 7), 0);
    }
}
