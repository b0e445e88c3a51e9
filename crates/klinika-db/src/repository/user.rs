//! # User Repository
//!
//! Database operations for staff accounts. The password hash is
//! produced by the caller; this layer never sees a plain password.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use klinika_core::{CreateUserInput, UpdateUserInput, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, full_name, role,
                   is_active, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Creates a staff account.
    ///
    /// ## Arguments
    /// * `password_hash` - argon2 hash computed by the caller
    pub async fn create(
        &self,
        input: &CreateUserInput,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> DbResult<User> {
        input.validate()?;

        debug!(username = %input.username, "Creating user");

        let is_active = input.is_active.unwrap_or(true);

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role,
                               is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(password_hash)
        .bind(&input.full_name)
        .bind(input.role)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: password_hash.to_string(),
            full_name: input.full_name.clone(),
            role: input.role,
            is_active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update to a staff account.
    ///
    /// ## Arguments
    /// * `password_hash` - new hash when the caller changed the password
    pub async fn update(
        &self,
        input: &UpdateUserInput,
        password_hash: Option<&str>,
        now: DateTime<Utc>,
    ) -> DbResult<User> {
        input.validate()?;

        let mut user = self
            .get_by_id(input.user_id)
            .await?
            .ok_or_else(|| DbError::not_found("User", input.user_id))?;

        if let Some(username) = &input.username {
            user.username = username.clone();
        }
        if let Some(email) = &input.email {
            user.email = email.clone();
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash.to_string();
        }
        if let Some(full_name) = &input.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        if let Some(is_active) = input.is_active {
            user.is_active = is_active;
        }
        user.updated_at = now;

        sqlx::query(
            r#"
            UPDATE users SET
                username = ?2, email = ?3, password_hash = ?4, full_name = ?5,
                role = ?6, is_active = ?7, updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all staff accounts.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, full_name, role,
                   is_active, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use klinika_core::UserRole;

    fn input(username: &str) -> CreateUserInput {
        CreateUserInput {
            username: username.to_string(),
            email: format!("{username}@klinika.example"),
            password: "secret123".to_string(),
            full_name: "Test User".to_string(),
            role: UserRole::Receptionist,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let user = db
            .users()
            .create(&input("frontdesk"), "hash", now)
            .await
            .unwrap();
        assert_eq!(user.username, "frontdesk");
        assert!(user.is_active);

        let users = db.users().list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].password_hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        db.users()
            .create(&input("frontdesk"), "hash", now)
            .await
            .unwrap();
        let err = db
            .users()
            .create(&input("frontdesk"), "hash", now)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let user = db
            .users()
            .create(&input("frontdesk"), "hash", now)
            .await
            .unwrap();

        let updated = db
            .users()
            .update(
                &UpdateUserInput {
                    user_id: user.id,
                    username: None,
                    email: None,
                    password: None,
                    full_name: Some("New Name".to_string()),
                    role: Some(UserRole::Admin),
                    is_active: Some(false),
                },
                None,
                now,
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name, "New Name");
        assert_eq!(updated.role, UserRole::Admin);
        assert!(!updated.is_active);
        // Untouched fields survive
        assert_eq!(updated.username, "frontdesk");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .users()
            .update(
                &UpdateUserInput {
                    user_id: 999,
                    username: None,
                    email: None,
                    password: None,
                    full_name: None,
                    role: None,
                    is_active: None,
                },
                None,
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
