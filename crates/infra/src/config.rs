//! Process configuration from environment variables.

use std::path::PathBuf;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API (identity boundary included).
    pub api_url: String,
    /// Where the bearer credential is persisted between runs.
    pub token_file: PathBuf,
}

impl Config {
    /// Read configuration from the environment, with logged dev defaults.
    pub fn from_env() -> Self {
        let api_url = std::env::var("WERKBANK_API_URL").unwrap_or_else(|_| {
            tracing::warn!("WERKBANK_API_URL not set; using http://localhost:8000/api/v1");
            "http://localhost:8000/api/v1".to_string()
        });

        let token_file = std::env::var_os("WERKBANK_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_file);

        Self {
            api_url,
            token_file,
        }
    }
}

fn default_token_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".werkbank").join("token.json"),
        None => std::env::temp_dir().join("werkbank-token.json"),
    }
}
