//! auth-server: signs claim sets into HS256 tokens.

pub mod errors;
pub mod routes;
pub mod startup;

pub use startup::run;
