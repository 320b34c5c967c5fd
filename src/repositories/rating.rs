//! Rating repository.
//!
//! One `Rating` record materializes per submission (auto-approved, for
//! reporting) in addition to the `rating` column on the ticket itself.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Rating;

pub struct RatingRepository;

impl RatingRepository {
    pub async fn create(pool: &PgPool, ticket_id: Uuid, rating: i16) -> Result<Rating, AppError> {
        let record = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (ticket_id, rating)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(rating)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
