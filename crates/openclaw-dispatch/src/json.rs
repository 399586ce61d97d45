/// Extract the first balanced-looking JSON object from `output`: the
/// substring from the first `{` through the last `}` (§4.2 plan pipeline).
///
/// This is a brace-matching heuristic, not a parser — the planner is
/// expected to emit exactly one JSON object, possibly surrounded by prose.
pub fn extract_json_payload(output: &str) -> Option<&str> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&output[start..=end])
}

/// Strip surrounding triple-backtick fences and a single layer of matching
/// outer quotes from agent output (§4.2 think pipeline).
pub fn normalize_think_output(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(fenced) = text.strip_prefix("```") {
        text = fenced.trim_start_matches(|c: char| c.is_alphabetic());
        if let Some(stripped) = text.strip_suffix("```") {
            text = stripped;
        }
        text = text.trim();
    }

    if text.len() >= 2 {
        let bytes = text.as_bytes();
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            text = &text[1..text.len() - 1];
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_spanning_first_to_last_brace() {
        let input = "here is your plan:\n{\"tasks\": [{\"name\": \"a\"}]}\nthanks";
        assert_eq!(
            extract_json_payload(input),
            Some("{\"tasks\": [{\"name\": \"a\"}]}")
        );
    }

    #[test]
    fn returns_none_when_no_braces_present() {
        assert_eq!(extract_json_payload("no json here"), None);
    }

    #[test]
    fn returns_none_when_braces_reversed() {
        assert_eq!(extract_json_payload("} oops {"), None);
    }

    #[test]
    fn normalize_strips_backtick_fence() {
        assert_eq!(normalize_think_output("```\nbuild a thing\n```"), "build a thing");
    }

    #[test]
    fn normalize_strips_outer_quotes() {
        assert_eq!(normalize_think_output("\"build a thing\""), "build a thing");
    }

    #[test]
    fn normalize_leaves_plain_text_unchanged() {
        assert_eq!(normalize_think_output("build a thing"), "build a thing");
    }
}
