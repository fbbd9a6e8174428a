//! Adapters layer
//!
//! The HTTP surface: DTOs, error mapping, handlers, middleware and routes.

pub mod http;
