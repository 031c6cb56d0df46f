//! business-service: the client-facing gateway. Checks bearer tokens and
//! listing fields, resolves categories by name and forwards everything to
//! io-service over HTTP.

pub mod auth;
pub mod category;
pub mod errors;
pub mod io_client;
pub mod observability;
pub mod retry;
pub mod routes;
pub mod search;
pub mod startup;
pub mod state;
pub mod validation;

pub use startup::run;
pub use state::AppState;
