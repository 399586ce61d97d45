use std::path::Path;

/// Load the persisted `getUpdates` offset (§4.6 step 2). Missing or
/// unparseable files default to 0 — same load-or-default idiom used for
/// the conversation buffer and bookmark files elsewhere in this workspace.
pub fn load_offset(path: &Path) -> i64 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Persist the offset after processing an update (§4.6 step 4).
pub fn save_offset(path: &Path, offset: i64) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, offset.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_defaults_to_zero() {
        assert_eq!(load_offset(Path::new("/nonexistent/offset/file")), 0);
    }

    #[test]
    fn save_and_load_roundtrips() {
        let dir = std::env::temp_dir().join("openclaw-telegram-test-offset");
        let path = dir.join(".telegram-offset");
        save_offset(&path, 42).unwrap();
        assert_eq!(load_offset(&path), 42);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
