use anyhow::Context;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{AuthError, UserRegistrationError};
use super::models::{StoredCredentialsModel, UserAccountModel};
use super::schemas::{AuthData, AuthenticateRequest, CreateUserAccount, UserAccount, UserRole};
use crate::configuration::JWTSettings;
use crate::schemas::Status;
use crate::utils::{generate_jwt_token_for_user, spawn_blocking_with_tracing};

#[tracing::instrument(
    name = "Validate credentials",
    skip(expected_password_hash, password_candidate)
)]
fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .context("Invalid password.")
        .map_err(AuthError::InvalidCredentials)
}

fn compute_password_hash(password: Secret<String>) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).unwrap(),
    )
    .hash_password(password.expose_secret().as_bytes(), &salt)?
    .to_string();
    Ok(Secret::new(password_hash))
}

#[tracing::instrument(name = "Get stored credentials", skip(identifier, pool))]
pub async fn get_stored_credentials(
    identifier: &str,
    pool: &PgPool,
) -> Result<Option<StoredCredentialsModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, StoredCredentialsModel>(
        r#"SELECT id, password_hash FROM user_account WHERE username = $1 OR email = $1"#,
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await
    .context("A database failure occurred while fetching stored credentials")?;
    Ok(row)
}

#[tracing::instrument(name = "Verify password", skip(password, stored))]
pub async fn verify_password(
    password: Secret<String>,
    stored: Option<&StoredCredentialsModel>,
) -> Result<(), AuthError> {
    // A fixed PHC string is verified when the identifier is unknown so the
    // request takes the same time either way.
    let mut expected_password_hash = Secret::new(
        "$argon2id$v=19$m=15000,t=2,p=1$\
        gZiV/M1gPc22ElAH/Jh1Hw$\
        CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno"
            .to_string(),
    );
    if let Some(stored) = stored {
        expected_password_hash = Secret::new(stored.password_hash.clone());
    }

    spawn_blocking_with_tracing(move || verify_password_hash(expected_password_hash, password))
        .await
        .context("Failed to spawn blocking task.")?
}

#[tracing::instrument(name = "Validate user credentials", skip(credentials, pool))]
pub async fn validate_user_credentials(
    credentials: AuthenticateRequest,
    pool: &PgPool,
) -> Result<Uuid, AuthError> {
    let stored = get_stored_credentials(&credentials.identifier, pool).await?;
    verify_password(credentials.password, stored.as_ref()).await?;
    stored
        .map(|s| s.id)
        .ok_or_else(|| AuthError::InvalidCredentials(anyhow::anyhow!("Unknown identifier")))
}

#[tracing::instrument(name = "Register user", skip(pool, user_account))]
pub async fn register_user(
    pool: &PgPool,
    user_account: CreateUserAccount,
) -> Result<Uuid, UserRegistrationError> {
    let password_hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(user_account.password.clone()).map(|hash| (user_account, hash))
    })
    .await
    .context("Failed to spawn blocking task.")?;
    let (user_account, password_hash) = password_hash?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO user_account (username, email, display_name, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&user_account.username)
    .bind(user_account.email.as_ref())
    .bind(&user_account.display_name)
    .bind(password_hash.expose_secret())
    .bind(user_account.role)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) => match db_err.constraint() {
            Some("user_account_email_key") => {
                UserRegistrationError::DuplicateEmail(anyhow::Error::new(e))
            }
            Some("user_account_username_key") => {
                UserRegistrationError::DuplicateUsername(anyhow::Error::new(e))
            }
            _ => UserRegistrationError::DatabaseError(
                "A database failure occurred while registering the user".to_string(),
                anyhow::Error::new(e),
            ),
        },
        _ => UserRegistrationError::DatabaseError(
            "A database failure occurred while registering the user".to_string(),
            anyhow::Error::new(e),
        ),
    })?;
    Ok(user_id)
}

#[tracing::instrument(name = "Fetch user account", skip(pool))]
pub async fn fetch_user_by_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserAccount>, anyhow::Error> {
    let row = sqlx::query_as::<_, UserAccountModel>(
        r#"
        SELECT id, username, email, display_name, role, is_active, is_deleted
        FROM user_account WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while fetching user account: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching the user account")
    })?;
    Ok(row.map(UserAccountModel::into_schema))
}

pub async fn get_auth_data(
    user: UserAccount,
    jwt: &JWTSettings,
) -> Result<AuthData, anyhow::Error> {
    let token = generate_jwt_token_for_user(user.id, jwt.expiry_hours, &jwt.secret)?;
    Ok(AuthData { user, token })
}

/// Returns `None` when the account may act, otherwise a customer-facing
/// rejection message.
pub fn validate_user_role(user: &UserAccount, allowed_roles: &[UserRole]) -> Option<String> {
    if user.is_deleted {
        return Some("User account is deleted. Please contact customer support".to_string());
    }
    if user.is_active == Status::Inactive {
        return Some("User account is inactive. Please contact customer support".to_string());
    }
    if !allowed_roles.contains(&user.role) {
        return Some("Insufficient privilege to perform this action".to_string());
    }
    None
}

#[tracing::instrument(name = "Hard delete user account", skip(pool))]
pub async fn hard_delete_user_account(pool: &PgPool, email: &str) -> Result<(), anyhow::Error> {
    sqlx::query(r#"DELETE FROM user_account WHERE email = $1"#)
        .bind(email)
        .execute(pool)
        .await
        .context("A database failure occurred while deleting the user account")?;
    Ok(())
}
