use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL_ENDPOINT: &str = "https://router.huggingface.co/v1/chat/completions";
pub const DEFAULT_MODEL_NAME: &str = "meta-llama/Meta-Llama-3-8B-Instruct";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing configuration: required environment variable '{0}' is not set")]
    MissingConfiguration(&'static str),

    #[error("Invalid configuration for '{key}': {reason}")]
    InvalidConfiguration { key: &'static str, reason: String },
}

/// Connection settings for the user collection.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    /// Table holding one document per user. Always a plain SQL identifier.
    pub collection: String,
}

/// Settings for the hosted chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_token: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Application configuration, read once at startup and handed to constructors.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub redis_url: String,
    pub model: ModelConfig,
    pub session_ttl: Duration,
    pub pdf_renderer: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingConfiguration(key))
        };

        let collection = require("USERS_COLLECTION")?;
        if !is_plain_identifier(&collection) {
            return Err(ConfigError::InvalidConfiguration {
                key: "USERS_COLLECTION",
                reason: "must contain only letters, digits and underscores".to_string(),
            });
        }

        Ok(Config {
            database: DatabaseConfig {
                url: require("DATABASE_URL")?,
                name: require("DATABASE_NAME")?,
                collection,
            },
            redis_url: require("REDIS_URL")?,
            model: ModelConfig {
                api_token: require("MODEL_API_TOKEN")?,
                endpoint: lookup("MODEL_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_MODEL_ENDPOINT.to_string()),
                model: lookup("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
                max_tokens: parse_or(&lookup, "MODEL_MAX_TOKENS", 2048)?,
                temperature: parse_or(&lookup, "MODEL_TEMPERATURE", 0.7)?,
                timeout: Duration::from_secs(parse_or(&lookup, "MODEL_TIMEOUT_SECS", 120)?),
            },
            session_ttl: session_ttl(&lookup)?,
            pdf_renderer: lookup("PDF_RENDERER").unwrap_or_else(|| "wkhtmltopdf".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidConfiguration {
                key,
                reason: e.to_string(),
            }),
    }
}

/// Session lifetime in minutes. Zero is rejected since Redis refuses a zero expiry.
fn session_ttl<F>(lookup: &F) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const KEY: &str = "SESSION_TTL_MINUTES";
    let minutes: u64 = parse_or(lookup, KEY, 720)?;
    if minutes == 0 {
        return Err(ConfigError::InvalidConfiguration {
            key: KEY,
            reason: "must be at least 1 minute".to_string(),
        });
    }
    let seconds = minutes
        .checked_mul(60)
        .ok_or_else(|| ConfigError::InvalidConfiguration {
            key: KEY,
            reason: "is too large".to_string(),
        })?;
    Ok(Duration::from_secs(seconds))
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
