use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SESSION_PATH: &str = "data/session.json";
pub const DEFAULT_UNIT_ID: u32 = 1;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the Myvivio API. `None` serves the built-in mock dataset.
    pub api_base_url: Option<String>,
    pub session_path: PathBuf,
    /// Unit (branch) the AI metrics are scoped to.
    pub unit_id: u32,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_base_url: None,
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            unit_id: DEFAULT_UNIT_ID,
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup("MYVIVIO_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty());

        Self {
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            api_base_url,
            session_path: lookup("MYVIVIO_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_path),
            unit_id: parsed(&lookup, "MYVIVIO_UNIT_ID").unwrap_or(defaults.unit_id),
            request_timeout: parsed(&lookup, "MYVIVIO_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.api_base_url.is_none()
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse::<T>().ok())
}
