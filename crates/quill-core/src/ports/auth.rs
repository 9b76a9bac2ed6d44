//! Admin authentication port.

/// Verifies the bearer credential presented on admin routes.
///
/// There are no user identities: a credential is either accepted or not.
pub trait AdminAuthenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<(), AuthError>;
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}
