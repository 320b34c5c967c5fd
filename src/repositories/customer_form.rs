//! Customer form repository.
//!
//! Forms are created only on admit paths that collect contact details and
//! are owned by the ticket that references them (no back-pointer, spec §9).

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CreateCustomerForm, CustomerForm};

pub struct CustomerFormRepository;

impl CustomerFormRepository {
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: CreateCustomerForm,
    ) -> Result<CustomerForm, AppError> {
        let form = sqlx::query_as::<_, CustomerForm>(
            r#"
            INSERT INTO customer_forms (name, contact, email, address, id_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.id_number)
        .fetch_one(&mut **tx)
        .await?;

        Ok(form)
    }

    pub async fn find_by_id(pool: &PgPool, form_id: Uuid) -> Result<Option<CustomerForm>, AppError> {
        let form = sqlx::query_as::<_, CustomerForm>(
            r#"SELECT * FROM customer_forms WHERE customer_form_id = $1"#,
        )
        .bind(form_id)
        .fetch_optional(pool)
        .await?;

        Ok(form)
    }

    /// Batch load for the display-name joins (spec §9: avoid N+1).
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<CustomerForm>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let forms = sqlx::query_as::<_, CustomerForm>(
            r#"SELECT * FROM customer_forms WHERE customer_form_id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(forms)
    }
}
