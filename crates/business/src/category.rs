use axum::http::StatusCode;
use common::types::CategoryRecord;
use tracing::{debug, info};

use crate::io_client::{IoApi, IoError};
use crate::observability::BusinessMetrics;

fn find_by_name(categories: &[CategoryRecord], name: &str) -> Option<i32> {
    let wanted = name.to_lowercase();
    categories.iter().find(|c| c.name.to_lowercase() == wanted).map(|c| c.id)
}

/// Id of the category called `name` (case-insensitive), creating it when no
/// such category exists yet. A create that loses a race to another request
/// (409) falls back to the row that request inserted.
pub async fn resolve_category(
    io: &dyn IoApi,
    metrics: &BusinessMetrics,
    name: &str,
) -> Result<i32, IoError> {
    if let Some(id) = find_by_name(&io.list_categories().await?, name) {
        return Ok(id);
    }
    match io.create_category(name).await {
        Ok(id) => {
            metrics.category_created();
            info!(category_id = id, name, "category created");
            Ok(id)
        }
        Err(IoError::Status(StatusCode::CONFLICT)) => {
            debug!(name, "category created concurrently, re-listing");
            find_by_name(&io.list_categories().await?, name)
                .ok_or(IoError::Status(StatusCode::CONFLICT))
        }
        Err(e) => Err(e),
    }
}
