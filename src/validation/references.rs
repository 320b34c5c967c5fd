//! Reference validation for foreign key relationships.
//!
//! Provides consistent validation for referenced entities (services, windows)
//! before database operations. This ensures clear 404 errors instead of
//! cryptic foreign key constraint violations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Office, Service};
use crate::repositories::ServiceRepository;

/// Validate that `service_id` exists, belongs to `office`, and is active.
/// Returns the service so callers don't have to re-fetch it.
pub async fn validate_service(pool: &PgPool, office: Office, service_id: Uuid) -> Result<Service, AppError> {
    let service = ServiceRepository::find_by_id(pool, service_id)
        .await?
        .ok_or_else(|| AppError::not_found("Service not found"))?;

    if !service_usable_in_office(&service, office) {
        return Err(AppError::not_found("Service not found"));
    }

    Ok(service)
}

/// A service is usable for an admit only if it belongs to the requesting
/// office and is still active. Pulled out of `validate_service` so the
/// rule can be exercised without a live pool.
fn service_usable_in_office(service: &Service, office: Office) -> bool {
    service.office == office && service.active
}

/// Validate that a service named `name` is active in `office` and return it
/// (admit paths look services up by name, spec §4.6.1).
pub async fn validate_service_by_name(
    pool: &PgPool,
    office: Office,
    name: &str,
) -> Result<Service, AppError> {
    ServiceRepository::find_active_by_name(pool, office, name)
        .await?
        .ok_or_else(|| AppError::not_found("Service not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(office: Office, active: bool) -> Service {
        Service {
            service_id: Uuid::new_v4(),
            office,
            name: "Transcript".to_string(),
            active,
            special_request: false,
        }
    }

    #[test]
    fn test_service_usable_in_office_requires_matching_office() {
        let svc = service(Office::Registrar, true);
        assert!(service_usable_in_office(&svc, Office::Registrar));
        assert!(!service_usable_in_office(&svc, Office::Admissions));
    }

    #[test]
    fn test_service_usable_in_office_requires_active() {
        let svc = service(Office::Registrar, false);
        assert!(!service_usable_in_office(&svc, Office::Registrar));
    }
}
