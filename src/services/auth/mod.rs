pub mod error;
pub mod factory;
pub mod gate;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use gate::AuthGate;
pub use password::PasswordHasher;
pub use token::{TokenClaims, TokenCodec};
