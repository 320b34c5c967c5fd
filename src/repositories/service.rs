//! Service repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateService, Office, Service};

pub struct ServiceRepository;

impl ServiceRepository {
    pub async fn create(pool: &PgPool, input: CreateService) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (office, name, active, special_request)
            VALUES ($1, $2, TRUE, $3)
            RETURNING *
            "#,
        )
        .bind(input.office)
        .bind(&input.name)
        .bind(input.special_request)
        .fetch_one(pool)
        .await?;

        Ok(service)
    }

    pub async fn find_by_id(pool: &PgPool, service_id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(r#"SELECT * FROM services WHERE service_id = $1"#)
            .bind(service_id)
            .fetch_optional(pool)
            .await?;

        Ok(service)
    }

    /// Active service with the given name in the office, if any.
    pub async fn find_active_by_name(
        pool: &PgPool,
        office: Office,
        name: &str,
    ) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"SELECT * FROM services WHERE office = $1 AND name = $2 AND active = TRUE"#,
        )
        .bind(office)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(service)
    }

    /// All services in the office; `public_only` filters out
    /// `special_request=true` services for kiosk/portal listings.
    pub async fn list_by_office(
        pool: &PgPool,
        office: Office,
        public_only: bool,
    ) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT * FROM services
            WHERE office = $1 AND active = TRUE AND (NOT $2 OR special_request = FALSE)
            ORDER BY name
            "#,
        )
        .bind(office)
        .bind(public_only)
        .fetch_all(pool)
        .await?;

        Ok(services)
    }

    /// Batch load services by id, keyed for the display-name/lookup
    /// joins (spec §9: avoid N+1 by fetching in one shot).
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Service>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let services = sqlx::query_as::<_, Service>(r#"SELECT * FROM services WHERE service_id = ANY($1)"#)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        Ok(services)
    }
}
