//! # Service Repository
//!
//! Catalog of billable clinical services (consultation, lab work, ...).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use klinika_core::{CreateServiceInput, Service, UpdateServiceInput};

const SERVICE_COLUMNS: &str =
    "id, name, description, price, duration_minutes, is_active, created_at, updated_at";

/// Repository for service database operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Gets a service by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Service>> {
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1");
        let service = sqlx::query_as::<_, Service>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    /// Adds a billable service.
    pub async fn create(&self, input: &CreateServiceInput, now: DateTime<Utc>) -> DbResult<Service> {
        input.validate()?;

        debug!(name = %input.name, "Creating service");

        let is_active = input.is_active.unwrap_or(true);

        let result = sqlx::query(
            r#"
            INSERT INTO services (name, description, price, duration_minutes,
                                  is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.duration_minutes)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Service {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            duration_minutes: input.duration_minutes,
            is_active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update to a service.
    pub async fn update(&self, input: &UpdateServiceInput, now: DateTime<Utc>) -> DbResult<Service> {
        input.validate()?;

        let mut service = self
            .get_by_id(input.service_id)
            .await?
            .ok_or_else(|| DbError::not_found("Service", input.service_id))?;

        if let Some(name) = &input.name {
            service.name = name.clone();
        }
        if input.description.is_some() {
            service.description = input.description.clone();
        }
        if let Some(price) = input.price {
            service.price = price;
        }
        if input.duration_minutes.is_some() {
            service.duration_minutes = input.duration_minutes;
        }
        if let Some(is_active) = input.is_active {
            service.is_active = is_active;
        }
        service.updated_at = now;

        sqlx::query(
            r#"
            UPDATE services SET
                name = ?2, description = ?3, price = ?4, duration_minutes = ?5,
                is_active = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration_minutes)
        .bind(service.is_active)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(service)
    }

    /// Lists all services.
    pub async fn list(&self) -> DbResult<Vec<Service>> {
        let sql = format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY name");
        let services = sqlx::query_as::<_, Service>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use klinika_core::Money;

    fn service_input(name: &str, price_cents: i64) -> CreateServiceInput {
        CreateServiceInput {
            name: name.to_string(),
            description: None,
            price: Money::from_cents(price_cents),
            duration_minutes: Some(15),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_active() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = db
            .services()
            .create(&service_input("Consultation", 10000), Utc::now())
            .await
            .unwrap();
        assert!(service.is_active);
        assert_eq!(service.price, Money::from_cents(10000));
    }

    #[tokio::test]
    async fn test_deactivate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = db
            .services()
            .create(&service_input("Consultation", 10000), Utc::now())
            .await
            .unwrap();

        let updated = db
            .services()
            .update(
                &UpdateServiceInput {
                    service_id: service.id,
                    name: None,
                    description: None,
                    price: None,
                    duration_minutes: None,
                    is_active: Some(false),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_update_missing_service() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .services()
            .update(
                &UpdateServiceInput {
                    service_id: 7,
                    name: None,
                    description: None,
                    price: None,
                    duration_minutes: None,
                    is_active: None,
                },
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
