//! Authentication module
//!
//! Provides JWT bearer tokens with bcrypt password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::AdminAuth;
pub use password::PasswordService;
