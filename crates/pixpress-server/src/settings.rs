use std::env;

use serde::Deserialize;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    /// `file` loads `.env` first, anything else reads the process environment only.
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Uploads allowed per client within one window.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
    /// Key rate limiting by `X-Forwarded-For`; only safe behind a proxy that sets it.
    #[serde(default)]
    pub trust_forwarded_for: bool,
    /// Daily rolling log files are written here when set; stdout otherwise.
    pub log_dir: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_env() -> String {
    "file".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_prefix() -> String {
    "/api".to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_rate_limit_max() -> u32 {
    30
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: default_env(),
            host: default_host(),
            port: default_port(),
            prefix: default_prefix(),
            max_upload_bytes: default_max_upload_bytes(),
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            trust_forwarded_for: false,
            log_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_env_file(&self) -> bool {
        self.env == "file"
    }
}

/// Load configuration from the environment, reading `.env` first unless
/// `ENV` says otherwise.
pub fn get_config() -> Result<Config, envy::Error> {
    let env_var = env::var("ENV").unwrap_or("file".to_string());
    if env_var == "file" {
        let _ = dotenvy::dotenv();
    }
    envy::from_env::<Config>()
}
