//! Server configuration

use std::path::PathBuf;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// JSON document holding the clinic records
    pub db_path: PathBuf,
    /// Intent corpus file; the built-in corpus is used when unset
    pub intents_path: Option<PathBuf>,
    /// Seed for canned-response selection
    pub response_seed: Option<u64>,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            db_path: std::env::var("DB_PATH")
                .unwrap_or_else(|_| "database.json".into())
                .into(),
            intents_path: std::env::var("INTENTS_PATH").ok().map(PathBuf::from),
            response_seed: std::env::var("RESPONSE_SEED").ok().and_then(|raw| {
                raw.parse()
                    .inspect_err(|_| tracing::warn!(value = %raw, "Ignoring invalid RESPONSE_SEED"))
                    .ok()
            }),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
            ),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
