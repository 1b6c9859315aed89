use core::fmt;
use std::{env, str::FromStr};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use tracing::debug;

use crate::models::error::ServerError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Dev,
    Prod,
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Dev => write!(f, "development"),
            Runtime::Prod => write!(f, "production"),
        }
    }
}

impl From<String> for Runtime {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PRODUCTION" => Runtime::Prod,
            _ => Runtime::Dev,
        }
    }
}

/// Which route set the service mounts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Server-rendered pages with htmx partial updates.
    Html,
    /// Fixed local files for the browser client of the JSON api.
    Static,
    #[default]
    Api,
}

impl Surface {
    pub fn needs_database(&self) -> bool {
        !matches!(self, Surface::Static)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Surface::Html => write!(f, "html"),
            Surface::Static => write!(f, "static"),
            Surface::Api => write!(f, "api"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default = "default_wanted_state")]
    pub wanted_state: String,
    #[serde(default)]
    pub html: HtmlConfig,
    #[serde(default)]
    pub static_files: StaticConfig,
    #[serde(skip_deserializing)]
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            surface: Surface::default(),
            wanted_state: default_wanted_state(),
            html: HtmlConfig::default(),
            static_files: StaticConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_wanted_state() -> String {
    "deseado".into()
}

fn default_image() -> String {
    "img/default.jpg".into()
}

fn default_static_root() -> String {
    "public".into()
}

fn default_db_host() -> String {
    "localhost".into()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".into()
}

fn default_db_name() -> String {
    "postgres".into()
}

fn default_ssl_mode() -> String {
    "prefer".into()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlConfig {
    /// Image stored for games created through the html form, which has no image input.
    #[serde(default = "default_image")]
    pub default_image: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            default_image: default_image(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_static_root")]
    pub root: String,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            root: default_static_root(),
        }
    }
}

/// Connection parameters read from `DB_HOST`, `DB_PORT`, `DB_USER`,
/// `DB_PASSWORD`, `DB_NAME` and `DB_SSL_MODE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            name: default_db_name(),
            ssl_mode: default_ssl_mode(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix("DB"))
    }

    /// Values stay strings until serde reads them, so credentials like `007`
    /// keep their leading zeros while `port` is still parsed as a number.
    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ServerError> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)?;

        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(ssl_mode);

        Ok(options)
    }

    /// Connection target without credentials, safe to log.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let runtime: Runtime = env::var("ENVIRONMENT").unwrap_or_default().into();

        let mut config: AppConfig = Config::builder()
            .add_source(File::with_name(&format!("config/{}", runtime)).required(false))
            .add_source(Environment::with_prefix("CATALOG").separator("__"))
            .build()?
            .try_deserialize()?;

        if config.surface.needs_database() {
            config.database = DatabaseConfig::from_env()?;
        }

        debug!(
            "Loaded {} config: {}",
            runtime,
            serde_json::to_string_pretty(&config).unwrap_or_default()
        );

        Ok(config)
    }
}
