//! Service configuration.
//!
//! Values are layered: built-in defaults, then `config.json` in the user's
//! config directory, then `JOB_ADMIN_*` environment variables, then CLI flags
//! (applied by the binary).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::routes::RouteFilterKind;

const CONFIG_FILE: &str = "config.json";

/// Where the menu store fetches its tree from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuSourceConfig {
    /// The built-in menu tree.
    Fixture,
    /// Another job-admin compatible API, e.g. `http://admin.internal/api/v1`.
    Remote {
        url: String,
        #[serde(default = "default_fetch_retries")]
        retries: u32,
    },
}

fn default_fetch_retries() -> u32 {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub menu_source: MenuSourceConfig,
    /// Upper bound for one menu fetch, in milliseconds.
    pub load_timeout_ms: u64,
    pub route_filter: RouteFilterKind,
    /// Trigger a background menu load when the server starts.
    pub load_on_startup: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            menu_source: MenuSourceConfig::Fixture,
            load_timeout_ms: 5_000,
            route_filter: RouteFilterKind::PassThrough,
            load_on_startup: true,
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the process environment.
    /// Falls back to defaults if the file is unreadable.
    pub fn load() -> Self {
        let mut config = match default_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Overlay `JOB_ADMIN_*` variables read through `lookup`.
    /// Unparseable values are logged and ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("JOB_ADMIN_HOST") {
            self.host = host;
        }
        if let Some(port) = parse_var(&lookup, "JOB_ADMIN_PORT") {
            self.port = port;
        }
        if let Some(timeout) = parse_var(&lookup, "JOB_ADMIN_LOAD_TIMEOUT_MS") {
            self.load_timeout_ms = timeout;
        }
        if let Some(filter) = parse_var(&lookup, "JOB_ADMIN_ROUTE_FILTER") {
            self.route_filter = filter;
        }
        if let Some(load) = parse_var(&lookup, "JOB_ADMIN_LOAD_ON_STARTUP") {
            self.load_on_startup = load;
        }
        if let Some(url) = lookup("JOB_ADMIN_MENU_URL") {
            let retries = parse_var(&lookup, "JOB_ADMIN_FETCH_RETRIES").unwrap_or_else(default_fetch_retries);
            self.menu_source = MenuSourceConfig::Remote { url, retries };
        }
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "job-admin")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
