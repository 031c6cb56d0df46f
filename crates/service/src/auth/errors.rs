use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("claims must contain a non-empty {0}")]
    MissingClaim(&'static str),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
}
