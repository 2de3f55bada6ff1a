use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub identity_token_secret: String,
    pub expiring_soon_days: u32,
    pub recent_offers_limit: usize,
    pub json_logs: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = ListingDefaults::default();
        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            identity_token_secret: get_env("IDENTITY_TOKEN_SECRET")?,
            expiring_soon_days: get_env_parse_or("EXPIRING_SOON_DAYS", defaults.expiring_soon_days)?,
            recent_offers_limit: get_env_parse_or("RECENT_OFFERS_LIMIT", defaults.recent_offers_limit)?,
            json_logs: env::var("LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    pub fn listing_defaults(&self) -> ListingDefaults {
        ListingDefaults {
            expiring_soon_days: self.expiring_soon_days,
            recent_offers_limit: self.recent_offers_limit,
        }
    }
}

/// Window sizes the listing endpoints fall back to when the caller gives none.
#[derive(Debug, Clone, Copy)]
pub struct ListingDefaults {
    pub expiring_soon_days: u32,
    pub recent_offers_limit: usize,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self {
            expiring_soon_days: 7,
            recent_offers_limit: 10,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
