mod argon2_hasher;
mod jwt_token_service;

pub use argon2_hasher::{
  Argon2PasswordHasher, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM,
};
pub use jwt_token_service::JwtTokenService;
