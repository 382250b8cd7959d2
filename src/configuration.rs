use config::{ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sqlx::{postgres::PgConnectOptions, ConnectOptions};

use crate::utils::deserialize_config_list;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub secret: SecretSetting,
    pub user: UserSettings,
    pub checkout: CheckoutSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    pub port: u16,
    pub host: String,
    pub name: String,
    pub acquire_timeout_seconds: u64,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.name)
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JWTSettings {
    pub secret: Secret<String>,
    pub expiry_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSetting {
    pub jwt: JWTSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserSettings {
    /// E-mail addresses allowed to register with the admin role.
    #[serde(deserialize_with = "deserialize_config_list")]
    pub admin_list: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CheckoutSettings {
    pub base_url: String,
    pub secret_key: Secret<String>,
    pub webhook_secret: Secret<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub currency: crate::schemas::CurrencyType,
    pub timeout_milliseconds: u64,
    pub reservation_hold_hours: i64,
}

impl CheckoutSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");
    let builder = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("configuration.yaml"),
        ))
        .add_source(Environment::default().separator("__"))
        .build()?;
    builder.try_deserialize::<Settings>()
}
