use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/office.json";

const DEFAULT_API_ORIGIN: &str = "http://localhost:8000";
const DEFAULT_WS_ORIGIN: &str = "ws://localhost:8000";

/// Path prefixes served by the backend HTTP origin.
const HTTP_PREFIXES: [&str; 4] = ["/api", "/avatars", "/office_layout", "/home_layout"];
const WS_PREFIX: &str = "/ws";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_origin: String,
    pub ws_origin: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub document_id: Option<i64>,
    pub document_version: Option<i64>,
    pub employee_id: Option<i64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            ws_origin: DEFAULT_WS_ORIGIN.to_string(),
            poll_interval_secs: 5,
            request_timeout_secs: 30,
            document_id: None,
            document_version: None,
            employee_id: None,
        }
    }
}

impl AppConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn routes(&self) -> BackendRoutes {
        BackendRoutes::new(&self.api_origin, &self.ws_origin)
    }

    /// `OFFICE_API_ORIGIN` / `OFFICE_WS_ORIGIN` win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(origin) = env::var("OFFICE_API_ORIGIN") {
            self.api_origin = origin;
        }
        if let Ok(origin) = env::var("OFFICE_WS_ORIGIN") {
            self.ws_origin = origin;
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

/// Maps request paths onto the backend origins, the way the web build's
/// dev proxy forwards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRoutes {
    http_origin: String,
    ws_origin: String,
}

impl BackendRoutes {
    pub fn new(http_origin: &str, ws_origin: &str) -> Self {
        Self {
            http_origin: http_origin.trim_end_matches('/').to_string(),
            ws_origin: ws_origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, path: &str) -> Option<String> {
        if has_prefix(path, WS_PREFIX) {
            return Some(format!("{}{path}", self.ws_origin));
        }
        HTTP_PREFIXES
            .iter()
            .any(|prefix| has_prefix(path, prefix))
            .then(|| format!("{}{path}", self.http_origin))
    }
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}
