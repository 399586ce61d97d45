//! `weather [location]` and `search <q>` local handlers (SPEC_FULL.md §4.1
//! item 11 expansion). Both are direct `reqwest` HTTP calls to the
//! respective third-party backend — unlike the Google façade, neither
//! companion exposes a local script, so there is no subprocess hop here.

use openclaw_core::config::InfoToolsSection;

const WEATHER_NOT_CONFIGURED: &str = "Weather lookup is not configured on this host.";
const SEARCH_NOT_CONFIGURED: &str = "Search is not configured on this host.";

/// `weather [location]` — current conditions from OpenWeatherMap, falling
/// back to the configured default location when no argument is given.
pub async fn weather(http: &reqwest::Client, config: &InfoToolsSection, arg: &str) -> String {
    let Some(api_key) = config.openweather_api_key.as_deref().filter(|k| !k.is_empty()) else {
        return WEATHER_NOT_CONFIGURED.to_string();
    };
    let location = if arg.is_empty() {
        config.weather_location.clone().unwrap_or_default()
    } else {
        arg.to_string()
    };
    if location.is_empty() {
        return WEATHER_NOT_CONFIGURED.to_string();
    }

    let url = "https://api.openweathermap.org/data/2.5/weather";
    let result = http
        .get(url)
        .query(&[
            ("q", location.as_str()),
            ("appid", api_key),
            ("units", "imperial"),
        ])
        .send()
        .await;

    match result {
        Ok(resp) => match resp.json::<serde_json::Value>().await {
            Ok(body) => format_weather(&location, &body),
            Err(_) => format!("Weather lookup for {location} failed (bad response)."),
        },
        Err(_) => format!("Weather lookup for {location} failed (request error)."),
    }
}

fn format_weather(location: &str, body: &serde_json::Value) -> String {
    let temp = body.get("main").and_then(|m| m.get("temp")).and_then(|v| v.as_f64());
    let description = body
        .get("weather")
        .and_then(|w| w.as_array())
        .and_then(|arr| arr.first())
        .and_then(|w| w.get("description"))
        .and_then(|v| v.as_str());

    match (temp, description) {
        (Some(temp), Some(desc)) => format!("{location}: {temp:.0}\u{b0}F, {desc}."),
        _ => format!("Weather lookup for {location} returned no data."),
    }
}

/// `search <q>` — top results from a configured SearXNG instance, formatted
/// as a numbered list.
pub async fn search(http: &reqwest::Client, config: &InfoToolsSection, query: &str) -> String {
    let Some(base_url) = config.searxng_url.as_deref().filter(|u| !u.is_empty()) else {
        return SEARCH_NOT_CONFIGURED.to_string();
    };
    if query.is_empty() {
        return "Usage: search <query>".to_string();
    }

    let url = format!("{}/search", base_url.trim_end_matches('/'));
    let result = http
        .get(&url)
        .query(&[("q", query), ("format", "json")])
        .send()
        .await;

    match result {
        Ok(resp) => match resp.json::<serde_json::Value>().await {
            Ok(body) => format_results(query, &body),
            Err(_) => format!("Search for \"{query}\" failed (bad response)."),
        },
        Err(_) => format!("Search for \"{query}\" failed (request error)."),
    }
}

fn format_results(query: &str, body: &serde_json::Value) -> String {
    let results = body.get("results").and_then(|r| r.as_array());
    let Some(results) = results.filter(|r| !r.is_empty()) else {
        return format!("No results for \"{query}\".");
    };

    let mut lines = vec![format!("Results for \"{query}\":")];
    for (i, result) in results.iter().take(5).enumerate() {
        let title = result.get("title").and_then(|v| v.as_str()).unwrap_or("(untitled)");
        let link = result.get("url").and_then(|v| v.as_str()).unwrap_or("");
        lines.push(format!("{}. {title} — {link}", i + 1));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_weather_renders_temp_and_description() {
        let body = serde_json::json!({
            "main": {"temp": 72.4},
            "weather": [{"description": "clear sky"}],
        });
        let out = format_weather("Freehold", &body);
        assert_eq!(out, "Freehold: 72\u{b0}F, clear sky.");
    }

    #[test]
    fn format_results_numbers_top_five() {
        let body = serde_json::json!({
            "results": [
                {"title": "A", "url": "http://a"},
                {"title": "B", "url": "http://b"},
            ]
        });
        let out = format_results("rust", &body);
        assert!(out.starts_with("Results for \"rust\":"));
        assert!(out.contains("1. A — http://a"));
        assert!(out.contains("2. B — http://b"));
    }

    #[test]
    fn format_results_empty_returns_no_results_message() {
        let body = serde_json::json!({ "results": [] });
        assert_eq!(format_results("nothing", &body), "No results for \"nothing\".");
    }
}
