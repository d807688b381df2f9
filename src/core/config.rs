use fred::prelude::{Server, ServerConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";
const DEFAULT_SENTINEL_PORT: u16 = 26379;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    FSError(#[from] std::io::Error),
    #[error(transparent)]
    SerdeError(#[from] toml::de::Error),
}

#[derive(Deserialize, Clone, Default)]
pub struct DB {
    pub database: String,
    pub host: String,
    pub user: String,
    pub password: String,
}

impl DB {
    fn is_valid(&self) -> bool {
        [&self.database, &self.host, &self.user, &self.password]
            .iter()
            .all(|value| !value.is_empty())
    }

    pub fn connection_string(&self) -> String {
        let user: String = url::form_urlencoded::byte_serialize(self.user.as_bytes()).collect();
        let password: String =
            url::form_urlencoded::byte_serialize(self.password.as_bytes()).collect();

        format!(
            "postgres://{}:{}@{}/{}",
            user, password, self.host, self.database
        )
    }
}

/// Session store connection. Either a plain connection string or a sentinel
/// setup; the connection string wins when sentinel is not enabled.
#[derive(Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub connection_string: Option<String>,
    pub sentinel_enabled: Option<bool>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub service_name: Option<String>,
}

impl TryFrom<RedisConfig> for fred::types::config::Config {
    type Error = String;

    fn try_from(value: RedisConfig) -> Result<Self, Self::Error> {
        if !value.sentinel_enabled.unwrap_or_default() {
            let connection_string = value
                .connection_string
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());

            return Self::from_url(connection_string.as_str()).map_err(|err| err.to_string());
        }

        let hostname = value.hostname.unwrap_or_default();
        Ok(Self {
            server: ServerConfig::Sentinel {
                service_name: value.service_name.unwrap_or_default(),
                hosts: vec![Server::new(
                    hostname.as_str(),
                    value.port.unwrap_or(DEFAULT_SENTINEL_PORT),
                )],
            },
            username: value.username,
            password: value.password,
            ..Default::default()
        })
    }
}

fn default_listen_address() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}

#[derive(Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default)]
    pub cors_hosts: Vec<String>,
    #[serde(default)]
    pub secure_session: bool,
    #[serde(default)]
    pub redis: RedisConfig,
    pub db: DB,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            cors_hosts: vec![],
            secure_session: false,
            redis: RedisConfig::default(),
            db: DB::default(),
        }
    }
}

impl Config {
    pub fn parse(path: Option<String>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let config_text = fs::read_to_string(Path::new(path.as_str()))?;

        Self::from_toml(config_text.as_str())
    }

    pub fn from_toml(config_text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config_text)?)
    }

    pub fn is_valid(&self) -> bool {
        self.db.is_valid()
    }
}
