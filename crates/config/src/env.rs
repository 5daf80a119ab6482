use copilot_common::error::{CopilotError, CopilotResult};
use serde::Deserialize;
use std::env;

use crate::llm::LlmConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present; every variable has a default.
    pub fn from_env() -> CopilotResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: get_var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "8080")?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            allowed_origins: parse_csv(&get_var_or("ALLOWED_ORIGINS", "http://localhost:5173")),
            rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE", "60")?,
            llm: LlmConfig::from_env()?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

pub(crate) fn get_opt_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

pub(crate) fn parse_var<T>(key: &str, default: &str) -> CopilotResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_var_or(key, default)
        .trim()
        .parse()
        .map_err(|e| CopilotError::Config(format!("invalid {key}: {e}")))
}
