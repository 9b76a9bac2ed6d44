//! Shared-secret admin token check.

use subtle::ConstantTimeEq;

use quill_core::ports::{AdminAuthenticator, AuthError};

/// Accepts exactly one configured admin token.
///
/// Comparison runs in constant time with respect to the token contents.
pub struct StaticTokenAuthenticator {
    token: Vec<u8>,
}

impl StaticTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().into_bytes(),
        }
    }
}

impl AdminAuthenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() || self.token.is_empty() {
            return Err(AuthError::InvalidToken("empty token".to_string()));
        }

        if bool::from(self.token.as_slice().ct_eq(token.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken("token mismatch".to_string()))
        }
    }
}
