//! Ticket repository: the Ticket Store Gateway (C2).
//!
//! Thin typed gateway over the document store (spec §4.2). Most reads take
//! `&PgPool`; the handful of operations that must observe-then-mutate more
//! than one row under lock (Next, Transfer) take `&mut Transaction` so the
//! dispatcher can compose them with `FOR UPDATE` row locks.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTicket, Office, Ticket, TicketFilters, TicketStatus};

pub struct TicketRepository;

impl TicketRepository {
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: NewTicket,
    ) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (
                office, number, transaction_no, service_id, window_id,
                role, student_status, priority, customer_form_id,
                status, currently_serving, queued_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'waiting', FALSE, NOW())
            RETURNING *
            "#,
        )
        .bind(input.office)
        .bind(input.number)
        .bind(&input.transaction_no)
        .bind(input.service_id)
        .bind(input.window_id)
        .bind(input.role)
        .bind(input.student_status)
        .bind(input.priority)
        .bind(input.customer_form_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ticket)
    }

    pub async fn find_by_id(pool: &sqlx::PgPool, ticket_id: Uuid) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(r#"SELECT * FROM tickets WHERE ticket_id = $1"#)
            .bind(ticket_id)
            .fetch_optional(pool)
            .await?;

        Ok(ticket)
    }

    /// Whether `transaction_no` is already held by a ticket that is not yet
    /// dead (spec I7/I8: unique across `waiting|serving|completed`).
    pub async fn has_active_transaction_no(
        pool: &sqlx::PgPool,
        transaction_no: &str,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM tickets
                WHERE transaction_no = $1
                  AND status IN ('waiting', 'serving', 'completed')
            )
            "#,
        )
        .bind(transaction_no)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Next (§4.6.2) candidate selection, restricted to `service_ids`.
    pub async fn find_next_waiting(
        tx: &mut Transaction<'_, Postgres>,
        office: Office,
        window_id: Uuid,
        service_ids: &[Uuid],
        is_priority: bool,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE office = $1 AND window_id = $2 AND status = 'waiting'
              AND priority = $3 AND service_id = ANY($4)
            ORDER BY queued_at ASC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(office)
        .bind(window_id)
        .bind(is_priority)
        .bind(service_ids)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Next (§4.6.2) step 1 fallback: re-query without the service filter.
    /// Admits transferred tickets whose original service is not in the
    /// window's set (spec §9 Open Question: behavior preserved as-is).
    pub async fn find_next_waiting_any_service(
        tx: &mut Transaction<'_, Postgres>,
        office: Office,
        window_id: Uuid,
        is_priority: bool,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE office = $1 AND window_id = $2 AND status = 'waiting' AND priority = $3
            ORDER BY queued_at ASC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(office)
        .bind(window_id)
        .bind(is_priority)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ticket)
    }

    pub async fn find_currently_serving(
        tx: &mut Transaction<'_, Postgres>,
        window_id: Uuid,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"SELECT * FROM tickets WHERE window_id = $1 AND currently_serving = TRUE FOR UPDATE"#,
        )
        .bind(window_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Next (§4.6.2) step 2: close whatever was being served at `w`.
    pub async fn complete_currently_serving(
        tx: &mut Transaction<'_, Postgres>,
        window_id: Uuid,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                status = 'completed', currently_serving = FALSE, completed_at = NOW()
            WHERE window_id = $1 AND currently_serving = TRUE
            RETURNING *
            "#,
        )
        .bind(window_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Next (§4.6.2) step 4: advance the selected candidate.
    pub async fn mark_serving(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: Uuid,
        processed_by: &str,
    ) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                status = 'serving', currently_serving = TRUE,
                called_at = NOW(), processed_by = $2
            WHERE ticket_id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(processed_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Skip (§4.6.5): mark the currently-serving ticket skipped.
    pub async fn mark_skipped(
        tx: &mut Transaction<'_, Postgres>,
        window_id: Uuid,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                status = 'skipped', currently_serving = FALSE, skipped_at = NOW()
            WHERE window_id = $1 AND currently_serving = TRUE
            RETURNING *
            "#,
        )
        .bind(window_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Previous (§4.6.4): most recent ticket completed at `w` today.
    pub async fn find_most_recent_completed_today(
        tx: &mut Transaction<'_, Postgres>,
        window_id: Uuid,
        today_start: DateTime<Utc>,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE window_id = $1 AND status = 'completed' AND completed_at >= $2
            ORDER BY completed_at DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(window_id)
        .bind(today_start)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Previous (§4.6.4): revert the currently-serving ticket to waiting,
    /// clearing `called_at`/`currently_serving` (its `completed_at`, if
    /// any from a prior cycle, is untouched).
    pub async fn revert_to_waiting(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: Uuid,
    ) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                status = 'waiting', currently_serving = FALSE, called_at = NULL
            WHERE ticket_id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Previous (§4.6.4): re-serve a previously-completed ticket. Its
    /// `completed_at` is deliberately left intact (spec §9 Open Question).
    pub async fn reserve_completed(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: Uuid,
    ) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET status = 'serving', currently_serving = TRUE
            WHERE ticket_id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Transfer (§4.6.6): move the ticket to a new window, recomputing
    /// `priority` from the destination window's name (I3/I4, P6).
    pub async fn transfer(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: Uuid,
        to_window_id: Uuid,
        new_priority: bool,
    ) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                window_id = $2, status = 'waiting', currently_serving = FALSE,
                called_at = NULL, priority = $3
            WHERE ticket_id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(to_window_id)
        .bind(new_priority)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ticket)
    }

    /// Requeue-all (§4.6.8): today's skipped tickets for the window's
    /// services back to waiting with a fresh `queued_at`.
    pub async fn requeue_all(
        pool: &sqlx::PgPool,
        office: Office,
        service_ids: &[Uuid],
        today_start: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                status = 'waiting', queued_at = NOW(), skipped_at = NULL
            WHERE office = $1 AND status = 'skipped' AND service_id = ANY($2)
              AND skipped_at >= $3
            RETURNING *
            "#,
        )
        .bind(office)
        .bind(service_ids)
        .bind(today_start)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// Requeue-selected (§4.6.8): same, further filtered by `numbers`.
    pub async fn requeue_selected(
        pool: &sqlx::PgPool,
        office: Office,
        service_ids: &[Uuid],
        today_start: DateTime<Utc>,
        numbers: &[i32],
    ) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                status = 'waiting', queued_at = NOW(), skipped_at = NULL
            WHERE office = $1 AND status = 'skipped' AND service_id = ANY($2)
              AND skipped_at >= $3 AND number = ANY($4)
            RETURNING *
            "#,
        )
        .bind(office)
        .bind(service_ids)
        .bind(today_start)
        .bind(numbers)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// Rating submission (§4.6.9): idempotent write, no ownership check.
    pub async fn set_rating(
        pool: &sqlx::PgPool,
        ticket_id: Uuid,
        rating: i16,
    ) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"UPDATE tickets SET rating = $2 WHERE ticket_id = $1 RETURNING *"#,
        )
        .bind(ticket_id)
        .bind(rating)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    /// Janitor (§4.8): roll stale `waiting`/`skipped` tickets to `no_show`.
    /// Null timestamps are treated as stale. Returns the number rolled over.
    pub async fn rollover_stale(
        pool: &sqlx::PgPool,
        office: Office,
        today_start: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tickets SET status = 'no_show'
            WHERE office = $1
              AND (
                (status = 'waiting' AND (queued_at < $2 OR queued_at IS NULL))
                OR (status = 'skipped' AND (skipped_at < $2 OR skipped_at IS NULL))
              )
            "#,
        )
        .bind(office)
        .bind(today_start)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Admin waiting list (§4.9), capped and ordered by `queued_at asc`.
    pub async fn list_waiting(pool: &sqlx::PgPool, filters: TicketFilters) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE ($1::office IS NULL OR office = $1)
              AND ($2::uuid IS NULL OR window_id = $2)
              AND status = 'waiting'
            ORDER BY queued_at ASC
            LIMIT $3
            "#,
        )
        .bind(filters.office)
        .bind(filters.window_id)
        .bind(filters.limit.unwrap_or(20))
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// Public snapshot (§4.9): capped list of the first five waiting
    /// tickets in the office, oldest first.
    pub async fn list_waiting_public(
        pool: &sqlx::PgPool,
        office: Office,
        limit: i64,
    ) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE office = $1 AND status = 'waiting'
            ORDER BY queued_at ASC
            LIMIT $2
            "#,
        )
        .bind(office)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// The ticket currently being served at `window_id`, if any.
    pub async fn find_currently_serving_readonly(
        pool: &sqlx::PgPool,
        window_id: Uuid,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"SELECT * FROM tickets WHERE window_id = $1 AND currently_serving = TRUE"#,
        )
        .bind(window_id)
        .fetch_optional(pool)
        .await?;

        Ok(ticket)
    }

    /// Up to `limit` upcoming waiting numbers at `window_id`, oldest first
    /// (lookup API "up next" aggregate, §4.9).
    pub async fn list_upcoming_numbers(
        pool: &sqlx::PgPool,
        window_id: Uuid,
        limit: i64,
    ) -> Result<Vec<i32>, AppError> {
        let numbers = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT number FROM tickets
            WHERE window_id = $1 AND status = 'waiting'
            ORDER BY queued_at ASC
            LIMIT $2
            "#,
        )
        .bind(window_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(numbers)
    }

    /// Today's skipped ticket numbers for an office (admin snapshot, §4.9).
    pub async fn list_skipped_numbers(
        pool: &sqlx::PgPool,
        office: Office,
        today_start: DateTime<Utc>,
    ) -> Result<Vec<i32>, AppError> {
        let numbers = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT number FROM tickets
            WHERE office = $1 AND status = 'skipped' AND skipped_at >= $2
            ORDER BY skipped_at ASC
            "#,
        )
        .bind(office)
        .bind(today_start)
        .fetch_all(pool)
        .await?;

        Ok(numbers)
    }

    /// Tickets admitted after `t`, used by the `(office, queuedAt >= t)`
    /// index (spec §4.2) for activity feeds.
    pub async fn list_since(
        pool: &sqlx::PgPool,
        office: Office,
        since: DateTime<Utc>,
    ) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"SELECT * FROM tickets WHERE office = $1 AND queued_at >= $2 ORDER BY queued_at ASC"#,
        )
        .bind(office)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// Row-locked read, used by dispatcher operations that need to
    /// re-check a single ticket's freshness mid-transaction.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Postgres>,
        ticket_id: Uuid,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"SELECT * FROM tickets WHERE ticket_id = $1 FOR UPDATE"#,
        )
        .bind(ticket_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(ticket)
    }
}
