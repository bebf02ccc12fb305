use dotenvy::dotenv;
use eyre::Result;
use std::{env, time::Duration};
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "https://api.etherscan.io/api";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub retries: u32,
    pub port: u16,
}

// never print the key
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("port", &self.port)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
            retries: 3,
            port: 8080,
        }
    }
}

pub fn load() -> Result<Config> {
    dotenv().ok();

    let cfg = from_lookup(|key| env::var(key).ok());
    if cfg.api_key.is_none() {
        warn!("ETHERSCAN_API_KEY is not set; the explorer may reject requests");
    }

    info!("Loaded config: {:?}", cfg);
    Ok(cfg)
}

/// Build a config from any key lookup, falling back to defaults for
/// missing or unparseable values.
pub fn from_lookup<F>(lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let api_url = lookup("ETHERSCAN_API_URL")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or(defaults.api_url);

    let api_key = lookup("ETHERSCAN_API_KEY")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let timeout = lookup("HTTP_TIMEOUT_SECS")
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(defaults.timeout);

    // at least one attempt
    let retries = lookup("FETCH_RETRIES")
        .and_then(|s| s.trim().parse::<u32>().ok())
        .map(|n| n.max(1))
        .unwrap_or(defaults.retries);

    let port = lookup("PORT")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(defaults.port);

    Config {
        api_url,
        api_key,
        timeout,
        retries,
        port,
    }
}
