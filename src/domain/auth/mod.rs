pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{AuthenticatedUser, IssuedToken, TokenClaims, User};
pub use errors::{AuthError, HashError, RepositoryError, ValidationError};
pub use services::{AuthService, AuthServiceConfig};
pub use value_objects::{Password, PasswordHash, SessionToken, Username};
