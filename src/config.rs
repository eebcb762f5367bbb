use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub recommender_url: String,
    pub recommender_model: String,
    pub recommender_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("BOOKIE_PORT", "3000"),
            database_url: try_load("DATABASE_URL", "sqlite://bookie.db"),
            recommender_url: try_load(
                "RECOMMENDER_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            recommender_model: try_load("RECOMMENDER_MODEL", "gpt-4o-mini"),
            recommender_key: read_secret("OPENAI_API_KEY"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Secrets come from a mounted file in deployment and from the environment
/// in development. Missing is allowed: the chat endpoint degrades, the rest
/// of the API does not need the key.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    if let Ok(s) = read_to_string(&path) {
        return Some(s.trim().to_string());
    }

    match env::var(secret_name) {
        Ok(s) => Some(s),
        Err(_) => {
            warn!("{secret_name} not configured, recommendations are disabled");
            None
        }
    }
}
