//! Signed identity tokens.
//!
//! auth-server issues them with [`TokenIssuer`]; business-service checks the
//! bearer header with [`TokenVerifier`]. Both sides share the HS256 secret from
//! configuration.

pub mod claims;
pub mod errors;
pub mod token;

pub use claims::TokenClaims;
pub use errors::TokenError;
pub use token::{TokenIssuer, TokenVerifier};
