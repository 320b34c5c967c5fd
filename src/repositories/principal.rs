//! Principal repository: admin login records, scoped to one office (spec §1 —
//! identity/RBAC resolution proper is out of scope; this is the thinnest
//! credential that can produce the `AuthenticatedPrincipal` the dispatcher
//! receives).

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::verify_pin;
use crate::error::AppError;
use crate::models::{Office, Principal};

pub struct PrincipalRepository;

impl PrincipalRepository {
    /// All active principals in an office, for PIN-scan login (teacher's
    /// `find_active_for_pin_verification` pattern, scoped per office since a
    /// login also selects which office's windows the session may operate).
    pub async fn find_active_by_office(
        pool: &PgPool,
        office: Office,
    ) -> Result<Vec<Principal>, AppError> {
        let principals = sqlx::query_as::<_, Principal>(
            r#"
            SELECT * FROM principals
            WHERE office = $1 AND is_active = TRUE
            "#,
        )
        .bind(office)
        .fetch_all(pool)
        .await?;

        Ok(principals)
    }

    pub async fn find_by_id(pool: &PgPool, principal_id: Uuid) -> Result<Option<Principal>, AppError> {
        let principal = sqlx::query_as::<_, Principal>(
            r#"SELECT * FROM principals WHERE principal_id = $1"#,
        )
        .bind(principal_id)
        .fetch_optional(pool)
        .await?;

        Ok(principal)
    }
}

/// Scan `candidates` for the one whose hash matches `pin` (teacher's
/// `verify_employee_pin` linear scan — PINs are short and per-office
/// candidate lists are small, so there's no index to check against).
pub fn find_matching<'a>(candidates: &'a [Principal], pin: &str) -> Result<Option<&'a Principal>, AppError> {
    for principal in candidates {
        if verify_pin(pin, &principal.pin_hash)? {
            return Ok(Some(principal));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_pin;
    use chrono::Utc;

    fn principal(pin: &str) -> Principal {
        Principal {
            principal_id: Uuid::new_v4(),
            office: Office::Registrar,
            display_name: "Jordan".to_string(),
            pin_hash: hash_pin(pin).unwrap(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_find_matching_returns_the_principal_whose_pin_verifies() {
        let candidates = vec![principal("1111"), principal("2222")];
        let found = find_matching(&candidates, "2222").unwrap().unwrap();
        assert_eq!(found.principal_id, candidates[1].principal_id);
    }

    #[test]
    fn test_find_matching_none_when_no_pin_matches() {
        let candidates = vec![principal("1111"), principal("2222")];
        assert!(find_matching(&candidates, "9999").unwrap().is_none());
    }

    #[test]
    fn test_find_matching_empty_candidates_is_none() {
        assert!(find_matching(&[], "1234").unwrap().is_none());
    }
}
