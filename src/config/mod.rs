/// Application configuration module
use std::env;
use std::net::SocketAddr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub nasa_backend_url: String,
    pub mars_backend_url: String,
    pub http_timeout_seconds: u64,
    pub mars: MarsSettings,
}

#[derive(Clone, Debug)]
pub struct MarsSettings {
    pub default_sol: u32,
    pub photo_limit: usize,
}

impl Default for MarsSettings {
    fn default() -> Self {
        Self {
            default_sol: 1000,
            photo_limit: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("BIND_ADDR is not a socket address: {}", e))?;

        let nasa_backend_url = env::var("NASA_BACKEND_URL")
            .unwrap_or_else(|_| "https://nasa-astronomy-backend.onrender.com".to_string());

        let mars_backend_url = env::var("MARS_BACKEND_URL")
            .unwrap_or_else(|_| "https://nasa-backend-2can.onrender.com".to_string());

        let defaults = MarsSettings::default();
        let mars = MarsSettings {
            default_sol: env_parse("MARS_DEFAULT_SOL", defaults.default_sol),
            photo_limit: env_parse("MARS_PHOTO_LIMIT", defaults.photo_limit),
        };

        Ok(Self {
            bind_addr,
            nasa_backend_url: trim_base(nasa_backend_url),
            mars_backend_url: trim_base(mars_backend_url),
            http_timeout_seconds: env_parse("HTTP_TIMEOUT_SECONDS", 30),
            mars,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
