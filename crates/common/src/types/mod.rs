//! JSON shapes exchanged between business-service and io-service.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok".into() }
    }
}

/// Body of every `201 Created` response.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedId {
    pub id: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: i32,
    pub name: String,
}

/// A house listing as served by io-service. `category` carries the category name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HouseRecord {
    pub id: i32,
    pub house: String,
    pub price: f64,
    pub surface: i64,
    pub description: String,
    pub category: String,
    pub username: String,
}

/// Create request accepted by `POST /io/houses`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewHouse {
    pub house: String,
    pub price: f64,
    pub surface: i64,
    pub description: String,
    pub category_id: i32,
    pub username: String,
}

/// Partial update accepted by `PUT /io/house/{id}`; absent fields are left alone.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HousePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i32>,
}

impl HousePatch {
    pub fn is_empty(&self) -> bool {
        self.house.is_none()
            && self.price.is_none()
            && self.surface.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
    }
}
