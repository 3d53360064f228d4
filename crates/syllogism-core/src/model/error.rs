use thiserror::Error;

/// Raised when a syllogism, conclusion or response token cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("invalid syllogism encoding {token:?}: {reason}")]
    Syllogism { token: String, reason: &'static str },
    #[error("invalid conclusion encoding {token:?}: {reason}")]
    Conclusion { token: String, reason: &'static str },
    #[error("syllogism index {0} out of range (expected 0..64)")]
    SyllogismIndex(usize),
    #[error("invalid direction {0:?}: expected 'ac' or 'ca'")]
    Direction(String),
}

impl EncodingError {
    pub(crate) fn syllogism(token: &str, reason: &'static str) -> Self {
        EncodingError::Syllogism {
            token: token.to_string(),
            reason,
        }
    }

    pub(crate) fn conclusion(token: &str, reason: &'static str) -> Self {
        EncodingError::Conclusion {
            token: token.to_string(),
            reason,
        }
    }
}
