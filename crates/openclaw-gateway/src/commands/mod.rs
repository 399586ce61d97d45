//! Local command handlers for §4.1 step 11: synchronous, string-returning
//! handlers for the gmail/calendar/weather/search/notes/links/briefing/
//! weeklyreview/memory keywords, resolved in SPEC_FULL.md's expansion of
//! `original_source/google-services.py`'s function surface and the
//! `OPENWEATHER_API_KEY`/`WEATHER_LOCATION`/`SEARXNG_URL` env vars (§6.8).

pub mod briefing;
pub mod info;
pub mod links;
pub mod notes;
