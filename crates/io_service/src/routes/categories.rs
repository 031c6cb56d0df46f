use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use common::{
    fields::{self, json_object},
    types::{CategoryRecord, CreatedId},
};
use sea_orm::DatabaseConnection;
use service::db::category_service;

use crate::errors::ApiError;

pub async fn create_category(
    State(db): State<DatabaseConnection>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    let obj = json_object(&body)?;
    let name = fields::text(&obj, "name")?.ok_or_else(|| ApiError::missing("name"))?;
    let id = category_service::create_category(&db, &name).await?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

pub async fn list_categories(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    Ok(Json(category_service::list_categories(&db).await?))
}
