//! Authentication use cases
//!
//! Each use case takes raw command input, builds the validated value
//! objects and delegates to `AuthService`.

mod authenticate_user;
mod login_user;
mod refresh_token;
mod register_user;

pub use authenticate_user::AuthenticateUserUseCase;
pub use login_user::{LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use refresh_token::{RefreshTokenResponse, RefreshTokenUseCase};
pub use register_user::{RegisterUserCommand, RegisterUserResponse, RegisterUserUseCase};
