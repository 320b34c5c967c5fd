//! Data access layer (repositories).
//!
//! Repositories handle database operations and provide a clean interface
//! for data access. Each repository is responsible for a specific domain entity.

pub mod admin_session;
pub mod customer_form;
pub mod document_request;
pub mod office_sequence;
pub mod principal;
pub mod rating;
pub mod service;
pub mod ticket;
pub mod window;

pub use admin_session::AdminSessionRepository;
pub use customer_form::CustomerFormRepository;
pub use document_request::DocumentRequestRepository;
pub use office_sequence::OfficeSequenceRepository;
pub use principal::PrincipalRepository;
pub use rating::RatingRepository;
pub use service::ServiceRepository;
pub use ticket::TicketRepository;
pub use window::WindowRepository;
