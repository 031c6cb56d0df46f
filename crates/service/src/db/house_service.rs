use common::types::{HousePatch, HouseRecord, NewHouse};
use models::{category, house};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, info};

use crate::errors::ServiceError;

fn to_record((h, c): (house::Model, Option<category::Model>)) -> HouseRecord {
    HouseRecord {
        id: h.id,
        house: h.house,
        price: h.price,
        surface: h.surface,
        description: h.description,
        category: c.map(|c| c.name).unwrap_or_default(),
        username: h.username,
    }
}

pub async fn list_houses(db: &DatabaseConnection) -> Result<Vec<HouseRecord>, ServiceError> {
    Ok(house::list_with_category(db).await?.into_iter().map(to_record).collect())
}

pub async fn get_house(db: &DatabaseConnection, id: i32) -> Result<HouseRecord, ServiceError> {
    house::find_with_category(db, id)
        .await?
        .map(to_record)
        .ok_or_else(|| ServiceError::not_found("house"))
}

/// Insert a listing. The referenced category must exist.
pub async fn create_house(db: &DatabaseConnection, input: &NewHouse) -> Result<i32, ServiceError> {
    if category::find(db, input.category_id).await?.is_none() {
        return Err(ServiceError::not_found("category"));
    }
    let created = house::create(
        db,
        house::NewListing {
            house: &input.house,
            price: input.price,
            surface: input.surface,
            description: &input.description,
            category_id: input.category_id,
            username: &input.username,
        },
    )
    .await?;
    info!(house_id = created.id, username = %created.username, "house_created");
    Ok(created.id)
}

/// Apply the fields present in `patch`. An unknown category in the patch is a
/// validation error rather than a missing house.
pub async fn update_house(
    db: &DatabaseConnection,
    id: i32,
    patch: &HousePatch,
) -> Result<HouseRecord, ServiceError> {
    let mut am: house::ActiveModel = house::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("house"))?
        .into();

    if let Some(name) = &patch.house { am.house = Set(name.clone()); }
    if let Some(price) = patch.price { am.price = Set(price); }
    if let Some(surface) = patch.surface { am.surface = Set(surface); }
    if let Some(description) = &patch.description { am.description = Set(description.clone()); }
    if let Some(category_id) = patch.category_id {
        if category::find(db, category_id).await?.is_none() {
            return Err(ServiceError::Validation(format!("unknown category {category_id}")));
        }
        am.category_id = Set(category_id);
    }

    if patch.is_empty() {
        debug!(house_id = id, "empty patch");
    } else {
        am.update(db).await?;
    }
    get_house(db, id).await
}

pub async fn delete_house(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    if !house::delete(db, id).await? {
        return Err(ServiceError::not_found("house"));
    }
    info!(house_id = id, "house_deleted");
    Ok(())
}
