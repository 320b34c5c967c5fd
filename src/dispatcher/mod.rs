//! Dispatcher (C6): admits tickets and executes the admin commands that
//! drive window state, under the per-window/per-office locking discipline
//! in spec §5.
//!
//! Organized as the redesign in spec §9 prescribes: one module per
//! operation rather than a single long procedure with inline branches.

pub mod admit;
pub mod next;
pub mod pause_resume;
pub mod previous;
pub mod rating;
pub mod recall;
pub mod requeue;
pub mod skip;
pub mod transfer;

pub use admit::{admit, AdmitOutcome, AdmitRequest, AdmitResult};
pub use next::{next, NextOutcome};
pub use pause_resume::{pause_resume, StopAction};
pub use previous::previous;
pub use rating::submit_rating;
pub use recall::recall;
pub use requeue::{requeue_all, requeue_selected};
pub use skip::{skip, SkipOutcome};
pub use transfer::transfer;

use crate::models::{Office, Window};

/// The four distinct admit paths a service name selects between (spec §9).
/// Each has its own validation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitPath {
    Enroll,
    DocumentClaim,
    DocumentRequest,
    Regular,
}

impl AdmitPath {
    pub fn classify(service_name: &str) -> Self {
        match service_name {
            crate::models::SERVICE_ENROLL => AdmitPath::Enroll,
            crate::models::SERVICE_DOCUMENT_CLAIM => AdmitPath::DocumentClaim,
            crate::models::SERVICE_DOCUMENT_REQUEST => AdmitPath::DocumentRequest,
            _ => AdmitPath::Regular,
        }
    }
}

use crate::error::AppError;

/// A window-mutating command's authorization precondition: the acting
/// principal's office must match the window's office. RBAC proper is out
/// of scope (spec §1); this is the one cross-office check the dispatcher
/// itself still owns.
pub fn require_same_office(window: &Window, office: Office) -> Result<(), AppError> {
    if window.office != office {
        return Err(AppError::forbidden(
            "Principal's office does not match the window's office",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_path_classify() {
        assert_eq!(AdmitPath::classify("Enroll"), AdmitPath::Enroll);
        assert_eq!(AdmitPath::classify("Document Claim"), AdmitPath::DocumentClaim);
        assert_eq!(AdmitPath::classify("Document Request"), AdmitPath::DocumentRequest);
        assert_eq!(AdmitPath::classify("Transcript"), AdmitPath::Regular);
    }
}
