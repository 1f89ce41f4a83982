use crate::utils::error_chain_fmt;

/// Reasons a presented activation token is refused.
///
/// Everything but `UnexpectedError` is an expected, user-facing outcome.
/// None of the messages include the stored hash or the candidate.
#[derive(thiserror::Error)]
pub enum VerificationError {
    #[error("There is no user to activate")]
    UserMissing,
    #[error("No activation token is configured for this user")]
    TokenNotConfigured,
    #[error("The activation token has expired")]
    TokenExpired,
    #[error("The activation token is invalid")]
    TokenInvalid,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl VerificationError {
    /// `true` for outcomes the caller should answer with a rejection, not a server error.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, VerificationError::UnexpectedError(_))
    }
}

impl std::fmt::Debug for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    #[error("{0}")]
    Malformed(String),
    #[error("The token signature does not match")]
    Mismatch,
}
