use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bot_token: String,
    pub port: u16,
    /// Maximum accepted age of a signed init data payload, in seconds.
    pub auth_max_age: i64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: require("DATABASE_URL"),
            bot_token: require("BOT_TOKEN"),
            port: try_load("PORT", "5000"),
            auth_max_age: try_load("AUTH_MAX_AGE", "86400"),
        }
    }
}

fn require(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
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
