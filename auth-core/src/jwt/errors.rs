use thiserror::Error;

/// Why a token was refused or could not be produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    BadSignature,

    /// `signature_verified` is set when the signature held but the claims
    /// inside are unusable.
    #[error("Token is malformed: {detail}")]
    Malformed {
        detail: String,
        signature_verified: bool,
    },

    #[error("Token is expired")]
    Expired,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

/// Rejected codec configuration. Fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecConfigError {
    #[error("Signing key is missing")]
    MissingKey,

    #[error("Signing key too short: minimum {min} bytes, got {actual}")]
    KeyTooShort { min: usize, actual: usize },

    #[error("Token TTL must be positive, got {0} seconds")]
    NonPositiveTtl(i64),

    #[error("Token TTL exceeds the maximum of {max_days} days")]
    TtlOutOfRange { max_days: i64 },
}

impl TokenError {
    /// Structurally invalid token, rejected before its signature was checked.
    pub fn malformed(detail: impl Into<String>) -> Self {
        TokenError::Malformed {
            detail: detail.into(),
            signature_verified: false,
        }
    }

    /// Authentic token whose claims are missing or empty.
    pub fn invalid_claims(detail: impl Into<String>) -> Self {
        TokenError::Malformed {
            detail: detail.into(),
            signature_verified: true,
        }
    }
}
