//! Domain models and database entities.
//!
//! Models represent the core business entities used throughout the application.

pub mod admin_session;
pub mod customer_form;
pub mod document_request;
pub mod office;
pub mod principal;
pub mod rating;
pub mod service;
pub mod ticket;
pub mod window;

pub use admin_session::{AdminSession, AdminSessionResponse, CreateAdminSession};
pub use customer_form::{CreateCustomerForm, CustomerForm};
pub use document_request::{CreateDocumentRequest, DocumentRequest, DocumentRequestStatus};
pub use office::{Office, OfficeLocation};
pub use principal::{AuthenticatedPrincipal, Principal};
pub use rating::{Rating, SubmitRating};
pub use service::{CreateService, Service, SERVICE_DOCUMENT_CLAIM, SERVICE_DOCUMENT_REQUEST, SERVICE_ENROLL};
pub use ticket::{
    display_name, CustomerRole, NewTicket, StudentStatus, Ticket, TicketFilters, TicketStatus,
};
pub use window::{CreateWindow, UpdateWindow, Window, PRIORITY_WINDOW_NAME};
