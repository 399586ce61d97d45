use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_ROUTER_PORT: u16 = 18801;
pub const DEFAULT_ASK_TIMEOUT_SEC: u64 = 180;
pub const DEFAULT_THINK_TIMEOUT_SEC: u64 = 240;
pub const DEFAULT_ADHOC_TIMEOUT_SEC: u64 = 1200;

fn default_router_port() -> u16 {
    DEFAULT_ROUTER_PORT
}
fn default_ask_timeout() -> u64 {
    DEFAULT_ASK_TIMEOUT_SEC
}
fn default_think_timeout() -> u64 {
    DEFAULT_THINK_TIMEOUT_SEC
}
fn default_adhoc_timeout() -> u64 {
    DEFAULT_ADHOC_TIMEOUT_SEC
}
fn default_pg_host() -> String {
    "localhost".into()
}
fn default_pg_port() -> String {
    "5433".into()
}
fn default_pg_db() -> String {
    "openclaw".into()
}
fn default_pg_user() -> String {
    "openclaw".into()
}
fn default_pg_password() -> String {
    "openclaw_dev_pass".into()
}
fn default_ack_reaction() -> String {
    "\u{1F44D}".into()
}
fn default_openclaw_node() -> String {
    "/usr/bin/node".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSection {
    #[serde(default = "default_router_port")]
    pub port: u16,
    #[serde(default = "default_ask_timeout")]
    pub ask_timeout_sec: u64,
    #[serde(default = "default_think_timeout")]
    pub think_timeout_sec: u64,
    #[serde(default = "default_adhoc_timeout")]
    pub adhoc_timeout_sec: u64,
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            port: default_router_port(),
            ask_timeout_sec: default_ask_timeout(),
            think_timeout_sec: default_think_timeout(),
            adhoc_timeout_sec: default_adhoc_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSection {
    #[serde(default = "default_pg_host")]
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: String,
    #[serde(default = "default_pg_db")]
    pub db: String,
    #[serde(default = "default_pg_user")]
    pub user: String,
    #[serde(default = "default_pg_password")]
    pub password: String,
}

impl Default for PostgresSection {
    fn default() -> Self {
        Self {
            host: default_pg_host(),
            port: default_pg_port(),
            db: default_pg_db(),
            user: default_pg_user(),
            password: default_pg_password(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramSection {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    /// Comma-separated allowlist entries; empty means deny-by-default.
    #[serde(default)]
    pub allow_from: Vec<String>,
    #[serde(default = "default_ack_reaction")]
    pub ack_reaction: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoToolsSection {
    #[serde(default)]
    pub openweather_api_key: Option<String>,
    #[serde(default)]
    pub weather_location: Option<String>,
    #[serde(default)]
    pub searxng_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCliSection {
    #[serde(default = "default_openclaw_node")]
    pub node: String,
    #[serde(default)]
    pub cli_path: Option<String>,
}

impl Default for AgentCliSection {
    fn default() -> Self {
        Self {
            node: default_openclaw_node(),
            cli_path: None,
        }
    }
}

/// Top-level configuration, loaded once at process startup and wrapped in
/// [`crate::runtime::Runtime`] for the remainder of the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenclawConfig {
    #[serde(default)]
    pub router: RouterSection,
    #[serde(default)]
    pub postgres: PostgresSection,
    #[serde(default)]
    pub telegram: TelegramSection,
    #[serde(default)]
    pub info_tools: InfoToolsSection,
    #[serde(default)]
    pub agent_cli: AgentCliSection,
}

/// Merge an individual environment variable into `figment` at `dotted_key`,
/// if present and non-empty.
///
/// The recognized variable names (§6.8) share no common prefix, so they
/// cannot be folded into a single prefixed `Env::prefixed(...)` provider.
/// Each one is merged in individually instead, keeping the rest of the
/// loader figment-idiomatic.
fn merge_env(figment: Figment, dotted_key: &'static str, var: &str) -> Figment {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => {
            figment.merge(Serialized::default(dotted_key, value))
        }
        _ => figment,
    }
}

impl OpenclawConfig {
    /// Load configuration from an optional TOML file plus the environment
    /// variables named in §6.8, in that precedence order (env wins).
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(OpenclawConfig::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = merge_env(figment, "router.port", "CHAT_ROUTER_PORT");
        figment = merge_env(
            figment,
            "router.ask_timeout_sec",
            "CHAT_ROUTER_ASK_TIMEOUT_SEC",
        );
        figment = merge_env(
            figment,
            "router.think_timeout_sec",
            "CHAT_ROUTER_THINK_TIMEOUT_SEC",
        );
        figment = merge_env(
            figment,
            "router.adhoc_timeout_sec",
            "CHAT_ROUTER_ADHOC_TIMEOUT_SEC",
        );

        figment = merge_env(figment, "postgres.host", "OPENCLAW_POSTGRES_HOST");
        figment = merge_env(figment, "postgres.port", "OPENCLAW_POSTGRES_PORT");
        figment = merge_env(figment, "postgres.db", "OPENCLAW_POSTGRES_DB");
        figment = merge_env(figment, "postgres.user", "OPENCLAW_POSTGRES_USER");
        figment = merge_env(figment, "postgres.password", "OPENCLAW_POSTGRES_PASSWORD");

        figment = merge_env(figment, "telegram.bot_token", "TELEGRAM_BOT_TOKEN");
        figment = merge_env(figment, "telegram.chat_id", "TELEGRAM_CHAT_ID");
        if let Ok(raw) = std::env::var("TELEGRAM_ALLOW_FROM") {
            let entries: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !entries.is_empty() {
                figment = figment.merge(Serialized::default("telegram.allow_from", entries));
            }
        }
        figment = merge_env(figment, "telegram.ack_reaction", "TELEGRAM_ACK_REACTION");

        figment = merge_env(
            figment,
            "info_tools.openweather_api_key",
            "OPENWEATHER_API_KEY",
        );
        figment = merge_env(figment, "info_tools.weather_location", "WEATHER_LOCATION");
        figment = merge_env(figment, "info_tools.searxng_url", "SEARXNG_URL");

        figment = merge_env(figment, "agent_cli.node", "OPENCLAW_NODE");
        figment = merge_env(figment, "agent_cli.cli_path", "OPENCLAW_CLI");

        Ok(figment.extract()?)
    }
}

/// Per-agent temperature defaults (§4.2), keyed by lowercase agent name.
pub fn default_temperature(agent: &str) -> f64 {
    match agent {
        "planner" => 0.25,
        "coder" => 0.18,
        "tester" => 0.10,
        _ => 0.20,
    }
}

/// Resolve the effective temperature for `agent`, honoring the precedence
/// rule in §4.2: `{AGENT}_TEMP` env var, then `OPENCLAW_{AGENT}_TEMP`, then
/// the hard-coded default. Out-of-range values are clamped to [0, 1].
///
/// This is a dynamic-key lookup (the variable name itself depends on
/// `agent`), which is why it is resolved here rather than through the
/// figment-based `OpenclawConfig` loader above.
pub fn agent_temperature(agent: &str) -> f64 {
    let normalized = agent.trim().to_lowercase();
    let default = default_temperature(&normalized);

    let direct = std::env::var(format!("{}_TEMP", normalized.to_uppercase()));
    let prefixed = std::env::var(format!("OPENCLAW_{}_TEMP", normalized.to_uppercase()));

    let raw = direct.or(prefixed).ok();
    let Some(raw) = raw else {
        return default;
    };

    match raw.parse::<f64>() {
        Ok(value) => value.clamp(0.0, 1.0),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_temperatures_match_spec_table() {
        assert_eq!(default_temperature("planner"), 0.25);
        assert_eq!(default_temperature("coder"), 0.18);
        assert_eq!(default_temperature("tester"), 0.10);
        assert_eq!(default_temperature("unknown"), 0.20);
    }

    #[test]
    fn config_loads_with_defaults_when_unset() {
        let config = OpenclawConfig::load(None).expect("defaults must load");
        assert_eq!(config.router.port, DEFAULT_ROUTER_PORT);
        assert_eq!(config.router.ask_timeout_sec, DEFAULT_ASK_TIMEOUT_SEC);
    }
}
