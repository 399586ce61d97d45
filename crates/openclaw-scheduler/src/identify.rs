/// Slugify a description (§4.4 step 3): lowercase, collapse any run of
/// non-`[a-z0-9]` characters to a single hyphen, trim to 40 chars, strip
/// leading/trailing hyphens.
pub fn slugify(description: &str) -> String {
    let lowered = description.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut last_was_sep = false;
    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('-');
            last_was_sep = true;
        }
    }
    let truncated: String = slug.chars().take(40).collect();
    truncated.trim_matches('-').to_string()
}

/// First 6 hex digits of the MD5 of `<slug>-<iso-now>` (§4.4 step 3).
pub fn hash6(slug: &str, iso_now: &str) -> String {
    let input = format!("{slug}-{iso_now}");
    let digest = md5::compute(input.as_bytes());
    format!("{digest:x}")[..6].to_string()
}

/// Full unit base name: `<prefix>-<slug>-<hash6>` (§4.4 step 3).
pub fn unit_name(prefix: &str, slug: &str, hash6: &str) -> String {
    format!("{prefix}-{slug}-{hash6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_non_alphanumeric_runs() {
        assert_eq!(slugify("Morning Report!!"), "morning-report");
    }

    #[test]
    fn slugify_truncates_to_40_chars_and_trims_edges() {
        let long = "a".repeat(50) + "!!!";
        let slug = slugify(&long);
        assert!(slug.len() <= 40);
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn hash6_is_deterministic_and_six_hex_chars() {
        let a = hash6("morning-report", "2024-01-01T00:00:00Z");
        let b = hash6("morning-report", "2024-01-01T00:00:00Z");
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash6_differs_for_different_timestamps() {
        let a = hash6("morning-report", "2024-01-01T00:00:00Z");
        let b = hash6("morning-report", "2024-01-01T00:00:01Z");
        assert_ne!(a, b);
    }

    #[test]
    fn unit_name_joins_prefix_slug_hash() {
        assert_eq!(
            unit_name("openclaw-job", "morning-report", "ab12cd"),
            "openclaw-job-morning-report-ab12cd"
        );
    }
}
