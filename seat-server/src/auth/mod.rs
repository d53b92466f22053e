//! Password hashing and session tokens.
//!
//! Login is two steps: username/password yields a `credentials` token,
//! and verifying a PNR upgrades it to a `journey` token. Marketplace
//! routes accept only the latter.

mod error;
mod password;
mod token;

pub use error::AuthError;
pub use password::{MIN_PASSWORD_LEN, hash_password, validate_password_strength, verify_password};
pub use token::{Claims, JwtConfig, Stage, issue_token, validate_token};
