use std::{env, net::IpAddr, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl FromStr for AppEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => Err(ConfigError::Invalid {
                key: "APP_ENV",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: AppEnv,
    pub host: IpAddr,
    pub port: u16,
    /// Load the sample leads and clients at startup.
    pub seed_sample_data: bool,
    /// When set, every route but `/health` requires this bearer token.
    pub access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            env: AppEnv::Development,
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            seed_sample_data: true,
            access_token: None,
        }
    }
}

/// Loads `.env`, then `.env.{APP_ENV}`, then reads the process environment.
pub fn load() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();
    let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let _ = dotenvy::from_filename(format!(".env.{env_name}"));

    Config::from_lookup(|key| env::var(key).ok())
}

impl Config {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            env: parse_or(&lookup, "APP_ENV", defaults.env)?,
            host: parse_or(&lookup, "HOST", defaults.host)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            seed_sample_data: match lookup("SEED_SAMPLE_DATA") {
                Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                    key: "SEED_SAMPLE_DATA",
                    value,
                })?,
                None => defaults.seed_sample_data,
            },
            access_token: lookup("ACCESS_TOKEN").filter(|token| !token.trim().is_empty()),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
