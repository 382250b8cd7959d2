use actix_web::rt::task::JoinHandle;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm as JWTAlgorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use crate::configuration::DatabaseSettings;
use crate::errors::CustomJWTTokenError;
use crate::migration;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    actix_web::rt::task::spawn_blocking(move || current_span.in_scope(f))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JWTClaims {
    pub sub: Uuid,
    pub exp: usize,
}

#[tracing::instrument(name = "Generate JWT token for user")]
pub fn generate_jwt_token_for_user(
    user_id: Uuid,
    expiry_hours: i64,
    secret: &Secret<String>,
) -> Result<Secret<String>, anyhow::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(expiry_hours))
        .expect("valid timestamp")
        .timestamp() as usize;
    let claims = JWTClaims {
        sub: user_id,
        exp: expiration,
    };
    let header = Header::new(JWTAlgorithm::HS256);
    let encoding_key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    let token = encode(&header, &claims, &encoding_key)?;
    Ok(Secret::new(token))
}

#[tracing::instrument(name = "Decode JWT token", skip(token, secret))]
pub fn decode_token<T: Into<String>>(
    token: T,
    secret: &Secret<String>,
) -> Result<Uuid, CustomJWTTokenError> {
    let decoding_key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let decoded = decode::<JWTClaims>(
        &token.into(),
        &decoding_key,
        &Validation::new(JWTAlgorithm::HS256),
    );
    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(CustomJWTTokenError::Expired),
            _ => Err(CustomJWTTokenError::Invalid("Invalid Token".to_string())),
        },
    }
}

pub fn deserialize_config_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let config_str = String::deserialize(deserializer)?;
    serde_json::from_str::<Vec<String>>(&config_str).map_err(serde::de::Error::custom)
}

#[tracing::instrument(name = "Create Database")]
pub async fn create_database(config: &DatabaseSettings) {
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");

    let db_count: Option<i64> =
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM pg_database WHERE datname = $1")
            .bind(&config.name)
            .fetch_optional(&mut connection)
            .await
            .unwrap_or(None);
    if db_count.unwrap_or(0) == 0 {
        // A concurrent caller may have created it in the meantime.
        if let Err(e) = connection
            .execute(format!(r#"CREATE DATABASE "{}";"#, config.name).as_str())
            .await
        {
            eprintln!("Failed to create database {}: {}", config.name, e);
        }
    }
}

#[tracing::instrument(name = "Configure Database")]
pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    create_database(config).await;
    let connection_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres.");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");
    connection_pool
}

#[tracing::instrument(name = "Run custom command")]
pub async fn run_custom_commands(args: Vec<String>) -> Result<(), anyhow::Error> {
    if args.len() > 1 {
        if args[1] == "migrate" {
            migration::run_migrations().await;
        }
    } else {
        println!("Invalid command. Enter a valid command");
    }

    Ok(())
}

#[cfg(test)]
pub mod tests {
    use crate::configuration::get_configuration;
    use crate::routes::user::schemas::{UserAccount, UserRole};
    use crate::schemas::Status;
    use crate::utils::configure_database;
    use sqlx::PgPool;
    use uuid::Uuid;

    pub async fn get_test_pool() -> PgPool {
        let configuration = get_configuration().expect("Failed to read configuration.");
        configure_database(&configuration.database).await
    }

    pub fn get_dummy_user_account(username: String, email: String, role: UserRole) -> UserAccount {
        UserAccount {
            id: Uuid::new_v4(),
            username,
            email,
            display_name: "Test Traveller".to_owned(),
            role,
            is_active: Status::Active,
            is_deleted: false,
        }
    }
}
