use std::env;
use anyhow::Result;
use tracing::{info, warn};

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub request_timeout_seconds: u64,
    pub max_text_length: usize,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_temperature: f32,
    pub gemini_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            max_file_size_mb: 10,
            request_timeout_seconds: 30,
            max_text_length: 3000,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_temperature: 0.2,
            gemini_api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

// The API key must never reach the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("max_text_length", &self.max_text_length)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_temperature", &self.gemini_temperature)
            .field("gemini_api_base", &self.gemini_api_base)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// `PORT` wins over `SERVER_PORT` so hosting platforms that inject it
    /// keep working. Unparseable values fall back to their defaults with a
    /// warning; out-of-range values are rejected by validation.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let server_port = match lookup("PORT") {
            Some(_) => Self::parse_var(&lookup, "PORT", defaults.server_port),
            None => Self::parse_var(&lookup, "SERVER_PORT", defaults.server_port),
        };

        let config = Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| {
                info!("SERVER_HOST not set, using default: {}", defaults.server_host);
                defaults.server_host.clone()
            }),
            server_port,
            max_file_size_mb: Self::parse_var(&lookup, "MAX_FILE_SIZE_MB", defaults.max_file_size_mb),
            request_timeout_seconds: Self::parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            max_text_length: Self::parse_var(&lookup, "MAX_TEXT_LENGTH", defaults.max_text_length),
            gemini_api_key: lookup("GEMINI_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|model| !model.trim().is_empty())
                .unwrap_or(defaults.gemini_model),
            gemini_temperature: Self::parse_var(&lookup, "GEMINI_TEMPERATURE", defaults.gemini_temperature),
            gemini_api_base: lookup("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .filter(|base| !base.is_empty())
                .unwrap_or(defaults.gemini_api_base),
        };

        config.validate()?;

        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set; analysis requests will be rejected until it is configured");
        }

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> T
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match lookup(var_name) {
            Some(val) => match val.trim().parse() {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    default
                }
            },
            None => {
                info!("{} not set, using default: {:?}", var_name, default);
                default
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.max_text_length == 0 {
            return Err(anyhow::anyhow!("MAX_TEXT_LENGTH must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.gemini_temperature) {
            return Err(anyhow::anyhow!("GEMINI_TEMPERATURE must be between 0.0 and 2.0"));
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn model_configured(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
