/// Truncate `s` to at most `max` chars, preserving UTF-8 boundaries, with
/// the given suffix appended when truncation occurred.
pub fn truncate_with_suffix(s: &str, max: usize, suffix: &str) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max).collect();
    format!("{truncated}{suffix}")
}

/// One-line preview of `s`, newline-collapsed and capped at 120 chars with
/// an ellipsis — the acknowledgement format used throughout the router.
pub fn preview(s: &str) -> String {
    let flat = s.replace('\n', " ");
    truncate_with_suffix(&flat, 117, "...")
}

/// Sanitize a free-form project name into a filesystem-safe slug: keep
/// alphanumerics and `._-`, replace everything else with `_`, and trim
/// leading/trailing `._-`. Falls back to `"project"` when empty.
pub fn sanitize_project_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || "._-".contains(c) { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches(|c| "._-".contains(c));
    if trimmed.is_empty() {
        "project".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_leaves_short_text_untouched() {
        assert_eq!(preview("hello"), "hello");
    }

    #[test]
    fn preview_collapses_newlines_and_truncates() {
        let long = "a".repeat(200);
        let out = preview(&format!("line one\n{long}"));
        assert!(!out.contains('\n'));
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 120);
    }

    #[test]
    fn sanitize_project_name_replaces_unsafe_chars() {
        assert_eq!(sanitize_project_name("My Project!"), "My_Project_");
    }

    #[test]
    fn sanitize_project_name_trims_edges_and_falls_back() {
        assert_eq!(sanitize_project_name("  ...  "), "project");
        assert_eq!(sanitize_project_name("-foo-"), "foo");
    }
}
