use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::{
    fields::{self, json_object, JsonObject},
    types::{CreatedId, HousePatch, HouseRecord, NewHouse},
};
use sea_orm::DatabaseConnection;
use service::db::house_service;

use super::parse_id;
use crate::errors::ApiError;

fn category_id(obj: &JsonObject) -> Result<Option<i32>, ApiError> {
    match fields::integer(obj, "category_id")? {
        None => Ok(None),
        Some(v) => i32::try_from(v)
            .map(Some)
            .map_err(|_| ApiError::BadRequest("category_id out of range".into())),
    }
}

fn required_text(obj: &JsonObject, key: &str) -> Result<String, ApiError> {
    fields::text(obj, key)?.ok_or_else(|| ApiError::missing(key))
}

fn new_house(obj: &JsonObject) -> Result<NewHouse, ApiError> {
    Ok(NewHouse {
        house: required_text(obj, "house")?,
        price: fields::number(obj, "price")?.ok_or_else(|| ApiError::missing("price"))?,
        surface: fields::integer(obj, "surface")?.ok_or_else(|| ApiError::missing("surface"))?,
        description: required_text(obj, "description")?,
        category_id: category_id(obj)?.ok_or_else(|| ApiError::missing("category_id"))?,
        username: required_text(obj, "username")?,
    })
}

fn house_patch(obj: &JsonObject) -> Result<HousePatch, ApiError> {
    Ok(HousePatch {
        house: fields::text(obj, "house")?,
        price: fields::number(obj, "price")?,
        surface: fields::integer(obj, "surface")?,
        description: fields::text(obj, "description")?,
        category_id: category_id(obj)?,
    })
}

pub async fn list_houses(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<HouseRecord>>, ApiError> {
    Ok(Json(house_service::list_houses(&db).await?))
}

pub async fn create_house(
    State(db): State<DatabaseConnection>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedId>), ApiError> {
    let input = new_house(&json_object(&body)?)?;
    let id = house_service::create_house(&db, &input).await?;
    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

pub async fn get_house(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> Result<Json<HouseRecord>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(house_service::get_house(&db, id).await?))
}

pub async fn update_house(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<HouseRecord>, ApiError> {
    let id = parse_id(&id)?;
    let obj = json_object(&body)?;
    if obj.is_empty() {
        return Err(ApiError::BadRequest("request body must not be empty".into()));
    }
    let patch = house_patch(&obj)?;
    Ok(Json(house_service::update_house(&db, id, &patch).await?))
}

pub async fn delete_house(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    house_service::delete_house(&db, id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: serde_json::Value) -> JsonObject {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let h = new_house(&obj(json!({
            "house": "Loft", "price": "150.5", "surface": "40",
            "description": "Bright", "category_id": "3", "username": "alice"
        })))
        .unwrap();
        assert_eq!(h.price, 150.5);
        assert_eq!(h.surface, 40);
        assert_eq!(h.category_id, 3);
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let err = new_house(&obj(json!({
            "house": "", "price": 1, "surface": 1,
            "description": "d", "category_id": 1, "username": "alice"
        })))
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn patch_keeps_only_present_fields() {
        let p = house_patch(&obj(json!({ "price": 10, "description": null }))).unwrap();
        assert_eq!(p, HousePatch { price: Some(10.0), ..Default::default() });
        assert!(house_patch(&obj(json!({ "surface": "big" }))).is_err());
    }
}
