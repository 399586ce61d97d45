//! `link <url> [tags...]` local handler (§3 Saved link, SPEC_FULL.md §4.1
//! item 11).
//!
//! Stored as a JSON array file; new entries appended (§3). Fetches the
//! URL and extracts its `<title>`, falling back to the URL itself when the
//! fetch fails — exactly the fallback §3 specifies.

use chrono::Utc;
use openclaw_core::paths::Paths;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLink {
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub saved_at: String,
}

pub async fn add_link(http: &reqwest::Client, paths: &Paths, url: &str, tags: &[String]) -> String {
    if url.is_empty() {
        return "Usage: link <url> [tags...]".to_string();
    }

    let title = fetch_title(http, url).await.unwrap_or_else(|| url.to_string());
    let entry = SavedLink {
        url: url.to_string(),
        title: title.clone(),
        tags: tags.to_vec(),
        saved_at: Utc::now().to_rfc3339(),
    };

    match save(paths, entry) {
        Ok(()) => format!("Saved: {title}"),
        Err(e) => format!("Failed to save link: {e}"),
    }
}

async fn fetch_title(http: &reqwest::Client, url: &str) -> Option<String> {
    let body = http.get(url).send().await.ok()?.text().await.ok()?;
    extract_title(&body)
}

fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_lowercase();
    let start = lower.find("<title")?;
    let open_end = html[start..].find('>')? + start + 1;
    let close = lower[open_end..].find("</title>")? + open_end;
    let title = html[open_end..close].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn save(paths: &Paths, entry: SavedLink) -> std::io::Result<()> {
    paths.ensure_context_dirs()?;
    let path = paths.links_file();
    let mut links: Vec<SavedLink> = std::fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default();
    links.push(entry);
    let json = serde_json::to_string_pretty(&links).unwrap_or_else(|_| "[]".to_string());
    std::fs::write(&path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_title_finds_simple_title_tag() {
        let html = "<html><head><title>Example Domain</title></head></html>";
        assert_eq!(extract_title(html), Some("Example Domain".to_string()));
    }

    #[test]
    fn extract_title_handles_attributes_on_tag() {
        let html = "<title lang=\"en\">  Hello World  </title>";
        assert_eq!(extract_title(html), Some("Hello World".to_string()));
    }

    #[test]
    fn extract_title_returns_none_when_missing() {
        assert_eq!(extract_title("<html><body>no title here</body></html>"), None);
    }
}
