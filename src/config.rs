use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation backend (trailing slash optional)
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of movies per genre row on the home page
    #[serde(default = "default_home_row_size")]
    pub home_row_size: u32,

    /// Number of movies on a genre collection page
    #[serde(default = "default_collection_row_size")]
    pub collection_row_size: u32,

    /// Per-request timeout for backend calls. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    "http://localhost:6010/".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_home_row_size() -> u32 {
    8
}

fn default_collection_row_size() -> u32 {
    32
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            host: default_host(),
            port: default_port(),
            home_row_size: default_home_row_size(),
            collection_row_size: default_collection_row_size(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables are prefixed with `RECSYS_`, e.g. `RECSYS_BACKEND_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("RECSYS_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
