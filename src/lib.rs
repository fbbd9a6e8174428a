//! Username/password authentication service
//!
//! Registers credentials, issues short-lived signed session tokens on login
//! and guards protected routes with them.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
