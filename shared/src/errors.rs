//! Error types shared across the API boundary

use thiserror::Error;

/// Why a bearer token was rejected.
///
/// Both kinds map to 401 at the HTTP boundary, but they carry distinct error
/// codes so clients can tell "log in again" apart from "this token was never
/// good".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// Signature verified but the token is past its expiration.
    #[error("Token expired")]
    Expired,

    /// Bad signature, malformed structure, or unexpected algorithm.
    #[error("Invalid token")]
    Invalid,
}

impl CredentialError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            CredentialError::Expired => "TOKEN_EXPIRED",
            CredentialError::Invalid => "INVALID_TOKEN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        assert_ne!(CredentialError::Expired.code(), CredentialError::Invalid.code());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(CredentialError::Expired.to_string(), "Token expired");
        assert_eq!(CredentialError::Invalid.to_string(), "Invalid token");
    }
}
