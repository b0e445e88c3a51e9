//! # User Commands
//!
//! Staff account management. Passwords are argon2-hashed here so the
//! database layer only ever sees the hash.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use tracing::debug;

use klinika_core::{CreateUserInput, UpdateUserInput, User};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn create_user(
    State(state): State<SharedState>,
    Json(input): Json<CreateUserInput>,
) -> Result<Json<User>, ApiError> {
    debug!(username = %input.username, "create_user command");

    input.validate().map_err(|e| ApiError::validation(e.to_string()))?;

    let password_hash = hash_password(&input.password)?;
    let user = state
        .db
        .users()
        .create(&input, &password_hash, Utc::now())
        .await?;

    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<SharedState>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<User>, ApiError> {
    debug!(user_id = input.user_id, "update_user command");

    input.validate().map_err(|e| ApiError::validation(e.to_string()))?;

    let password_hash = match &input.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = state
        .db
        .users()
        .update(&input, password_hash.as_deref(), Utc::now())
        .await?;

    Ok(Json(user))
}

pub async fn get_users(State(state): State<SharedState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.db.users().list().await?;
    Ok(Json(users))
}

/// Hashes a plain password with a fresh random salt.
fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("failed to hash password: {e}")))?;

    Ok(hash.to_string())
}
