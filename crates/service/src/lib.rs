//! Service layer between the HTTP crates and `models`.
//! - `db`: category and house operations returning wire records.
//! - `auth`: HS256 token issuing and verification shared by auth-server and business-service.

pub mod errors;
pub mod auth;
pub mod db;
#[cfg(test)]
pub mod test_support;
