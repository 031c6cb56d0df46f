use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use common::{
    fields::json_object,
    types::{CreatedId, HousePatch, HouseRecord, NewHouse},
};
use service::auth::TokenClaims;
use tracing::info;

use crate::{
    auth::require_owner,
    category::resolve_category,
    errors::ApiError,
    search,
    state::AppState,
    validation::{validate_create, validate_update},
};

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Fetch listing `id` and make sure the caller owns it.
async fn owned_house(state: &AppState, claims: &TokenClaims, id: i32) -> Result<HouseRecord, ApiError> {
    let house = state.io.get_house(id).await?;
    if house.username != claims.username {
        return Err(ApiError::Forbidden);
    }
    Ok(house)
}

pub async fn create_house(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    require_owner(&claims)?;
    let listing = validate_create(&json_object(&body)?)?;
    let category_id = resolve_category(state.io.as_ref(), &state.metrics, &listing.category).await?;

    let id = state
        .io
        .create_house(&NewHouse {
            house: listing.house,
            price: listing.price,
            surface: listing.surface,
            description: listing.description,
            category_id,
            username: claims.username.clone(),
        })
        .await?;
    state.metrics.house_listed();
    info!(house_id = id, username = %claims.username, "listing created");
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

pub async fn list_houses(State(state): State<AppState>) -> Result<Json<Vec<HouseRecord>>, ApiError> {
    Ok(Json(state.io.list_houses().await?))
}

pub async fn personal_houses(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<Vec<HouseRecord>>, ApiError> {
    require_owner(&claims)?;
    Ok(Json(search::by_owner(state.io.list_houses().await?, &claims.username)))
}

pub async fn houses_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<HouseRecord>>, ApiError> {
    Ok(Json(search::by_category(state.io.list_houses().await?, &category)))
}

pub async fn houses_by_owner(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<HouseRecord>>, ApiError> {
    Ok(Json(search::by_owner(state.io.list_houses().await?, &owner)))
}

pub async fn search_houses(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<HouseRecord>>, ApiError> {
    Ok(Json(search::by_keyword(state.io.list_houses().await?, &keyword)))
}

pub async fn delete_house(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_owner(&claims)?;
    let id = parse_id(&id)?;
    owned_house(&state, &claims, id).await?;
    state.io.delete_house(id).await?;
    state.metrics.house_removed();
    info!(house_id = id, username = %claims.username, "listing deleted");
    Ok(StatusCode::OK)
}

pub async fn update_house(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<HouseRecord>, ApiError> {
    require_owner(&claims)?;
    let id = parse_id(&id)?;
    owned_house(&state, &claims, id).await?;

    let obj = json_object(&body)?;
    if obj.is_empty() {
        return Err(ApiError::BadRequest("request body must not be empty".into()));
    }
    let changes = validate_update(&obj)?;
    let category_id = match &changes.category {
        Some(name) => Some(resolve_category(state.io.as_ref(), &state.metrics, name).await?),
        None => None,
    };
    let patch = HousePatch {
        house: changes.house,
        price: changes.price,
        surface: changes.surface,
        description: changes.description,
        category_id,
    };
    Ok(Json(state.io.update_house(id, &patch).await?))
}
