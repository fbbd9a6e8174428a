//! Domain layer
//!
//! Credential records, session-token claims, the error taxonomy and the
//! ports (traits) that infrastructure adapters implement.

pub mod auth;
