//! Infrastructure layer
//!
//! Configuration loading and the concrete adapters behind the domain
//! ports: credential stores, the password hasher and the token signer.

pub mod config;
pub mod persistence;
pub mod security;
