//! Window repository: staffed service points and their open/serving flags.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateWindow, Office, UpdateWindow, Window};

pub struct WindowRepository;

impl WindowRepository {
    pub async fn create(pool: &PgPool, input: CreateWindow) -> Result<Window, AppError> {
        let window = sqlx::query_as::<_, Window>(
            r#"
            INSERT INTO windows (office, name, service_ids, is_open, is_serving)
            VALUES ($1, $2, $3, FALSE, TRUE)
            RETURNING *
            "#,
        )
        .bind(input.office)
        .bind(&input.name)
        .bind(&input.service_ids)
        .fetch_one(pool)
        .await?;

        Ok(window)
    }

    pub async fn find_by_id(pool: &PgPool, window_id: Uuid) -> Result<Option<Window>, AppError> {
        let window = sqlx::query_as::<_, Window>(r#"SELECT * FROM windows WHERE window_id = $1"#)
            .bind(window_id)
            .fetch_optional(pool)
            .await?;

        Ok(window)
    }

    /// Row-locking variant for use inside a dispatcher transaction
    /// (Next, Transfer: §4.2 "multi-document transaction... that touch two
    /// windows").
    pub async fn find_by_id_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        window_id: Uuid,
    ) -> Result<Option<Window>, AppError> {
        let window = sqlx::query_as::<_, Window>(
            r#"SELECT * FROM windows WHERE window_id = $1 FOR UPDATE"#,
        )
        .bind(window_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(window)
    }

    pub async fn list_by_office(pool: &PgPool, office: Office) -> Result<Vec<Window>, AppError> {
        let windows = sqlx::query_as::<_, Window>(
            r#"SELECT * FROM windows WHERE office = $1 ORDER BY name"#,
        )
        .bind(office)
        .fetch_all(pool)
        .await?;

        Ok(windows)
    }

    pub async fn list_open_by_office(pool: &PgPool, office: Office) -> Result<Vec<Window>, AppError> {
        let windows = sqlx::query_as::<_, Window>(
            r#"SELECT * FROM windows WHERE office = $1 AND is_open = TRUE ORDER BY name"#,
        )
        .bind(office)
        .fetch_all(pool)
        .await?;

        Ok(windows)
    }

    pub async fn update(
        pool: &PgPool,
        window_id: Uuid,
        input: UpdateWindow,
    ) -> Result<Window, AppError> {
        let window = sqlx::query_as::<_, Window>(
            r#"
            UPDATE windows SET
                name = COALESCE($2, name),
                service_ids = COALESCE($3, service_ids),
                is_open = COALESCE($4, is_open)
            WHERE window_id = $1
            RETURNING *
            "#,
        )
        .bind(window_id)
        .bind(&input.name)
        .bind(&input.service_ids)
        .bind(input.is_open)
        .fetch_one(pool)
        .await?;

        Ok(window)
    }

    /// Pause/Resume (§4.6.7): toggle the advisory `is_serving` flag.
    pub async fn set_is_serving(
        pool: &PgPool,
        window_id: Uuid,
        is_serving: bool,
    ) -> Result<Window, AppError> {
        let window = sqlx::query_as::<_, Window>(
            r#"UPDATE windows SET is_serving = $2 WHERE window_id = $1 RETURNING *"#,
        )
        .bind(window_id)
        .bind(is_serving)
        .fetch_one(pool)
        .await?;

        Ok(window)
    }

    /// Batch load for the display-name/lookup joins (spec §9: avoid N+1).
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Window>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let windows = sqlx::query_as::<_, Window>(r#"SELECT * FROM windows WHERE window_id = ANY($1)"#)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        Ok(windows)
    }
}
