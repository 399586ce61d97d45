use std::sync::Arc;

use crate::config::OpenclawConfig;
use crate::paths::Paths;

/// The one piece of process-lifetime global state (§9 Design Notes).
///
/// Bundles env-derived configuration (read once at startup) and filesystem
/// path anchors. Constructed before the HTTP server binds, held for the
/// life of the process, and handed to every component by reference —
/// nothing in this workspace reaches back into `std::env` for configuration
/// after `Runtime::init` returns (the dynamic per-agent temperature lookup
/// in `config::agent_temperature` is the one deliberate exception, since its
/// key name is itself data).
#[derive(Debug, Clone)]
pub struct Runtime {
    pub config: Arc<OpenclawConfig>,
    pub paths: Arc<Paths>,
}

impl Runtime {
    pub fn init(config_path: Option<&str>) -> crate::error::Result<Self> {
        let config = OpenclawConfig::load(config_path)?;
        let paths = Paths::discover();
        Ok(Self {
            config: Arc::new(config),
            paths: Arc::new(paths),
        })
    }
}
