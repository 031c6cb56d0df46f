//! io-service: the only component touching the database. Exposes plain CRUD
//! over categories and houses under `/io`.

pub mod errors;
pub mod routes;
pub mod startup;

pub use startup::{run, serve};
