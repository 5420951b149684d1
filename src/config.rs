use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub viacep_base_url: String,
    pub viacep_token: String,
    pub request_timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_backoff_base_ms: u64,
    pub cache_ttl_secs: u64,
    pub pool_idle_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            viacep_base_url: {
                let url = std::env::var("VIACEP_BASE_URL")
                    .unwrap_or_else(|_| "https://viacep.com.br".to_string());
                if url.trim().is_empty() {
                    anyhow::bail!("VIACEP_BASE_URL cannot be empty");
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("VIACEP_BASE_URL must start with http:// or https://");
                }
                url
            },
            viacep_token: std::env::var("VIACEP_TOKEN")
                .map_err(|_| anyhow::anyhow!("VIACEP_TOKEN environment variable required"))
                .and_then(|token| {
                    if token.trim().is_empty() {
                        anyhow::bail!("VIACEP_TOKEN cannot be empty");
                    }
                    Ok(token)
                })?,
            request_timeout_secs: parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?,
            retry_max_attempts: std::env::var("RETRY_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RETRY_MAX_ATTEMPTS must be a non-negative integer"))?,
            retry_backoff_base_ms: parse_env_u64("RETRY_BACKOFF_BASE_MS", 1000)?,
            cache_ttl_secs: parse_env_u64("CACHE_TTL_SECS", 600)?,
            pool_idle_timeout_secs: parse_env_u64("POOL_IDLE_TIMEOUT_SECS", 300)?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("ViaCEP base URL: {}", config.viacep_base_url);
        tracing::debug!("ViaCEP token: [REDACTED]");
        tracing::debug!(
            "Request timeout: {}s, retries: {}, backoff base: {}ms",
            config.request_timeout_secs,
            config.retry_max_attempts,
            config.retry_backoff_base_ms
        );
        tracing::debug!("Response cache TTL: {}s", config.cache_ttl_secs);
        tracing::debug!("Server port: {}", config.port);

        Ok(config)
    }
}

fn parse_env_u64(name: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer", name)),
        Err(_) => Ok(default),
    }
}
