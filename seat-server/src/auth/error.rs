//! Authentication error types.

/// Errors from hashing or token handling.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Argon2 failed to hash, or a stored hash is malformed
    #[error("password hash error: {0}")]
    Hash(String),

    /// Token could not be signed or did not validate
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AuthError::Hash(e.to_string())
    }
}
