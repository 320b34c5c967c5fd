//! Numbering Service (C3) persistence: the per-office daily sequence.
//!
//! One row per `(office, seq_date)`. `next` wraps `99 -> 1` inside a single
//! atomic `INSERT ... ON CONFLICT ... DO UPDATE ... RETURNING`, the same
//! single-statement-atomic-update shape the teacher uses for
//! `store_settings.get_and_increment_ticket_number`.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::config::MAX_TICKET_NUMBER;
use crate::error::AppError;
use crate::models::Office;

pub struct OfficeSequenceRepository;

impl OfficeSequenceRepository {
    /// Assign the next ticket number for `office` on `seq_date`, wrapping
    /// `MAX_TICKET_NUMBER -> 1` (spec I5, B1).
    pub async fn next(pool: &PgPool, office: Office, seq_date: NaiveDate) -> Result<i32, AppError> {
        let number = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO office_sequences (office, seq_date, last_number)
            VALUES ($1, $2, 1)
            ON CONFLICT (office, seq_date) DO UPDATE SET
                last_number = CASE
                    WHEN office_sequences.last_number >= $3 THEN 1
                    ELSE office_sequences.last_number + 1
                END
            RETURNING last_number
            "#,
        )
        .bind(office)
        .bind(seq_date)
        .bind(MAX_TICKET_NUMBER)
        .fetch_one(pool)
        .await?;

        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_ticket_number_is_99() {
        assert_eq!(MAX_TICKET_NUMBER, 99);
    }
}
