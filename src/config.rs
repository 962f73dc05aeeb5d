//! Runtime configuration
//!
//! All environment access happens here, once, at startup. Components
//! receive explicit values instead of reading globals mid-query.

use crate::error::AgentError;
use crate::Result;
use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the capability agents. Required.
    pub gemini_api_key: String,
    /// Market-data API endpoint; market routes are disabled without it.
    pub market_api_base_url: Option<String>,
    pub activity_log_dir: PathBuf,
    pub api_port: u16,
}

impl Config {
    /// Load configuration from the process environment (and .env, if
    /// present). A missing API key is fatal: no query can be served
    /// without it.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AgentError::ConfigError(
                    "GEMINI_API_KEY not found in environment or .env file".to_string(),
                )
            })?;

        let market_api_base_url = env::var("MARKET_API_BASE_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string());

        let activity_log_dir = env::var("ACTIVITY_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR));

        let api_port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            gemini_api_key,
            market_api_base_url,
            activity_log_dir,
            api_port,
        })
    }
}
