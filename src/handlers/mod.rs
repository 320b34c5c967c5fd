//! HTTP request handlers.
//!
//! Handlers process incoming requests, extract state, and delegate to
//! `dispatcher`/`lookup`/the repositories for all business logic.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod lookup;
pub mod queue;
