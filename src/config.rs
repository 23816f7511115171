use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    /// Warm-up interval for cursor-less process CPU sampling.
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
    /// Freshness window for the cached CPU temperature reading.
    #[serde(default = "default_temperature_cache_secs")]
    pub temperature_cache_secs: u64,
}

fn default_port() -> u16 {
    8090
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_warmup_ms() -> u64 {
    1000
}

fn default_temperature_cache_secs() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            warmup_ms: default_warmup_ms(),
            temperature_cache_secs: default_temperature_cache_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from CONFIG_FILE (default config.toml). A missing file means
    /// built-in defaults; a present but invalid file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.sampling.warmup_ms > 0,
            "sampling.warmup_ms must be > 0, got {}",
            self.sampling.warmup_ms
        );
        anyhow::ensure!(
            self.sampling.temperature_cache_secs > 0,
            "sampling.temperature_cache_secs must be > 0, got {}",
            self.sampling.temperature_cache_secs
        );
        Ok(())
    }
}
