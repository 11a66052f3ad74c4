use std::{fmt::Display, str::FromStr};

use tracing::info;

pub struct Config {
    /// Base URL of the forum data service, e.g. `http://localhost:5000`.
    pub api_url: String,
    pub bind_addr: String,
    pub session_minutes: i64,
}

impl Config {
    pub fn load() -> Config {
        Config {
            api_url: dotenv::var("FORUM_API_URL")
                .expect("FORUM_API_URL must point at the forum service"),
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080"),
            session_minutes: try_load("SESSION_MINUTES", "60"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    dotenv::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| format!("invalid {key}: {e}"))
        .expect("environment misconfigured")
}
