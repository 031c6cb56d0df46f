use sea_orm::{entity::prelude::*, sea_query::ForeignKeyAction, ActiveValue::NotSet, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{category, errors::ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "house")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub house: String,
    pub price: f64,
    pub surface: i64,
    pub description: String,
    pub category_id: i32,
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Category }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Field values for a new listing.
#[derive(Clone, Debug)]
pub struct NewListing<'a> {
    pub house: &'a str,
    pub price: f64,
    pub surface: i64,
    pub description: &'a str,
    pub category_id: i32,
    pub username: &'a str,
}

fn require(value: &str, field: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, listing: NewListing<'_>) -> Result<Model, ModelError> {
    require(listing.house, "house")?;
    require(listing.description, "description")?;
    require(listing.username, "username")?;
    let am = ActiveModel {
        id: NotSet,
        house: Set(listing.house.to_string()),
        price: Set(listing.price),
        surface: Set(listing.surface),
        description: Set(listing.description.to_string()),
        category_id: Set(listing.category_id),
        username: Set(listing.username.to_string()),
    };
    Ok(am.insert(db).await?)
}

/// All listings paired with their category.
pub async fn list_with_category(
    db: &DatabaseConnection,
) -> Result<Vec<(Model, Option<category::Model>)>, ModelError> {
    Ok(Entity::find()
        .find_also_related(category::Entity)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

pub async fn find_with_category(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<(Model, Option<category::Model>)>, ModelError> {
    Ok(Entity::find_by_id(id)
        .find_also_related(category::Entity)
        .one(db)
        .await?)
}

pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
