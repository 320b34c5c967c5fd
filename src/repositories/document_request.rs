//! Document Request repository.
//!
//! The dispatcher only reads approved requests (§3); the `Document Request`
//! admit path writes a new one (a non-queuing record, not a ticket).

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{CreateDocumentRequest, DocumentRequest, DocumentRequestStatus};

pub struct DocumentRequestRepository;

impl DocumentRequestRepository {
    /// Generates a fresh, unique `transaction_no` in the
    /// `AA000000-000` shape and records the request as `pending`.
    pub async fn create(
        pool: &PgPool,
        input: CreateDocumentRequest,
        transaction_no: &str,
    ) -> Result<DocumentRequest, AppError> {
        let request = sqlx::query_as::<_, DocumentRequest>(
            r#"
            INSERT INTO document_requests (transaction_no, name, contact, email, request_items, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(transaction_no)
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.email)
        .bind(&input.request_items)
        .bind(DocumentRequestStatus::Pending)
        .fetch_one(pool)
        .await?;

        Ok(request)
    }

    /// Looked up by the `Document Claim` admit path; `transaction_no` is
    /// matched case-insensitively but stored/compared uppercased (§4.6.1).
    pub async fn find_by_transaction_no(
        pool: &PgPool,
        transaction_no: &str,
    ) -> Result<Option<DocumentRequest>, AppError> {
        let request = sqlx::query_as::<_, DocumentRequest>(
            r#"SELECT * FROM document_requests WHERE transaction_no = $1"#,
        )
        .bind(transaction_no)
        .fetch_optional(pool)
        .await?;

        Ok(request)
    }
}
