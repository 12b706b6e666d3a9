//! User accounts - registration and password login.
//!
//! Passwords are hashed with Argon2 (default parameters, random salt) and only
//! the PHC string is stored. Neither operation ever returns the hash.

use crate::{
    core::{validate, view::UserView},
    entities::{User, user},
    errors::{Error, Result},
};
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Username/password pair used for both registration and login
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Unique login name
    pub username: String,
    /// Plain-text password, only ever hashed
    pub password: String,
}

fn password_task_error(e: tokio::task::JoinError) -> Error {
    Error::PasswordHash {
        message: e.to_string(),
    }
}

/// Hashes on the blocking pool; Argon2 is CPU bound.
async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::PasswordHash {
                message: e.to_string(),
            })
    })
    .await
    .map_err(password_task_error)?
}

async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || -> Result<bool> {
        let parsed = PasswordHash::new(&stored_hash).map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(password_task_error)?
}

/// Registers a new user.
///
/// # Errors
/// [`Error::Validation`] for a blank username or password, [`Error::Conflict`]
/// when the username is taken.
pub async fn register_user(db: &DatabaseConnection, credentials: Credentials) -> Result<UserView> {
    let username = validate::require_text("username", &credentials.username)?;
    if credentials.password.is_empty() {
        return Err(Error::validation("password is required"));
    }
    let password_hash = hash_password(credentials.password).await?;

    let user = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set(username.clone()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
    };
    let created = user.insert(db).await.map_err(|e| {
        Error::conflict_on_unique(e, format!("User with the name '{username}' already exists"))
    })?;

    info!(id = %created.id, "Registered user {}", created.username);
    Ok(created.into())
}

/// Checks a username/password pair.
///
/// # Errors
/// [`Error::NotFound`] for an unknown username, [`Error::InvalidCredentials`]
/// for a wrong password.
pub async fn login(db: &DatabaseConnection, credentials: Credentials) -> Result<UserView> {
    let username = validate::require_text("username", &credentials.username)?;
    let user = User::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Username" })?;

    if !verify_password(credentials.password, user.password_hash.clone()).await? {
        warn!(username = %username, "Rejected login with wrong password");
        return Err(Error::InvalidCredentials);
    }

    info!(id = %user.id, "User logged in");
    Ok(user.into())
}
