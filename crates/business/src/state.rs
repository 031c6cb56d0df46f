use std::sync::Arc;

use service::auth::TokenVerifier;

use crate::io_client::IoApi;
use crate::observability::BusinessMetrics;

#[derive(Clone)]
pub struct AppState {
    pub io: Arc<dyn IoApi>,
    pub verifier: TokenVerifier,
    pub metrics: Arc<BusinessMetrics>,
}
