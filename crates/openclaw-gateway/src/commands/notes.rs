//! `note <text>` local handler (§3 Note file, SPEC_FULL.md §4.1 item 11).
//!
//! One Markdown file per UTC date; each line is `- [HH:MM] <text>` (§3).

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use openclaw_core::paths::Paths;

pub fn append_note(paths: &Paths, text: &str) -> String {
    if text.is_empty() {
        return "Usage: note <text>".to_string();
    }
    if let Err(e) = paths.ensure_notes_dir() {
        return format!("Failed to create notes directory: {e}");
    }

    let now = Utc::now();
    let date = now.format("%Y-%m-%d").to_string();
    let stamp = now.format("%H:%M").to_string();
    let file = paths.note_file(&date);

    match append_line(&file, &format!("- [{stamp}] {text}")) {
        Ok(()) => format!("Noted ({date})."),
        Err(e) => format!("Failed to write note: {e}"),
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_note_rejects_empty_text() {
        let paths = Paths::from_home(Path::new("/tmp/openclaw-notes-test-unused"));
        assert_eq!(append_note(&paths, ""), "Usage: note <text>");
    }
}
