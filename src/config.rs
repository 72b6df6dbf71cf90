use axum::http::HeaderValue;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default base URL of the OpenAI-compatible chat-completion API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used for summaries unless `SUMMARIZATION_MODEL` overrides it.
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "gpt-4o-mini";
/// Port used when `SERVER_PORT` is unset.
pub const DEFAULT_SERVER_PORT: u16 = 8000;
/// Request body limit applied to `/upload` unless `MAX_UPLOAD_BYTES` overrides it.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
/// Origins allowed to call the API when `CORS_ALLOWED_ORIGINS` is unset.
pub const DEFAULT_CORS_ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:3000",
    "https://your-vercel-app.vercel.app",
];

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the docsum server.
#[derive(Clone)]
pub struct Config {
    /// Bearer token for the summarization API.
    pub openai_api_key: String,
    /// Base URL of the chat-completion API, without a trailing `/chat/completions`.
    pub openai_base_url: String,
    /// Model identifier sent with every summarization request.
    pub summarization_model: String,
    /// Port the HTTP server listens on.
    pub server_port: u16,
    /// Origins permitted by the CORS layer.
    pub cors_allowed_origins: Vec<String>,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("summarization_model", &self.summarization_model)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let openai_api_key = optional("OPENAI_API_KEY")
            .map(|value| value.trim().to_string())
            .ok_or_else(|| ConfigError::MissingVariable("OPENAI_API_KEY".into()))?;

        let openai_base_url = optional("OPENAI_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        let summarization_model = optional("SUMMARIZATION_MODEL")
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| DEFAULT_SUMMARIZATION_MODEL.to_string());

        let server_port = optional("SERVER_PORT")
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_SERVER_PORT);

        let max_upload_bytes = optional("MAX_UPLOAD_BYTES")
            .map(|value| match value.trim().parse::<usize>() {
                Ok(bytes) if bytes > 0 => Ok(bytes),
                _ => Err(ConfigError::InvalidValue("MAX_UPLOAD_BYTES".into())),
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let cors_allowed_origins = match optional("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => DEFAULT_CORS_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        };

        Ok(Self {
            openai_api_key,
            openai_base_url,
            summarization_model,
            server_port,
            cors_allowed_origins,
            max_upload_bytes,
        })
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        return Err(ConfigError::InvalidValue("CORS_ALLOWED_ORIGINS".into()));
    }
    // The CORS layer needs each origin as a header value; reject anything it cannot carry.
    if origins
        .iter()
        .any(|origin| origin == "*" || HeaderValue::from_str(origin).is_err())
    {
        return Err(ConfigError::InvalidValue("CORS_ALLOWED_ORIGINS".into()));
    }
    Ok(origins)
}

/// Seed the process environment from a `.env` file in the working directory or its parents.
///
/// Variables already set in the environment win. Call this before `logging::init_tracing` so
/// `RUST_LOG` and `DOCSUM_LOG_FILE` from `.env` take effect.
pub fn load_env_file() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
}

/// Seed the environment from `.env` (when present) and load the configuration.
pub fn load_config() -> Result<Config, ConfigError> {
    load_env_file();
    let config = Config::from_env()?;
    tracing::debug!(
        openai_base_url = %config.openai_base_url,
        model = %config.summarization_model,
        server_port = config.server_port,
        cors_allowed_origins = ?config.cors_allowed_origins,
        max_upload_bytes = config.max_upload_bytes,
        "Loaded configuration"
    );
    Ok(config)
}
