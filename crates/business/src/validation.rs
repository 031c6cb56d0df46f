//! Field rules for listing creates and updates.
//!
//! Both accept numbers as JSON numbers or numeric strings. A field that is
//! missing, `null` or `""` counts as absent.

use common::fields::{self, JsonObject};

use crate::errors::ApiError;

pub const DEFAULT_CATEGORY: &str = "Others";

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidListing {
    pub house: String,
    pub price: f64,
    pub surface: i64,
    pub description: String,
    pub category: String,
}

/// The validated subset of an update request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingChanges {
    pub house: Option<String>,
    pub price: Option<f64>,
    pub surface: Option<i64>,
    pub description: Option<String>,
    pub category: Option<String>,
}

fn bad(msg: &str) -> ApiError {
    ApiError::BadRequest(msg.to_string())
}

fn category(obj: &JsonObject) -> Result<Option<String>, ApiError> {
    Ok(fields::text(obj, "category")?
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty()))
}

pub fn validate_create(obj: &JsonObject) -> Result<ValidListing, ApiError> {
    let house = fields::text(obj, "house")?;
    let description = fields::text(obj, "description")?;
    let (Some(house), Some(description)) = (house, description) else {
        return Err(bad("house, price, surface and description are required"));
    };

    let price = fields::number(obj, "price").map_err(|_| bad("Price and surface must be numbers"))?;
    let surface = fields::integer(obj, "surface").map_err(|_| bad("Price and surface must be numbers"))?;
    let (Some(price), Some(surface)) = (price, surface) else {
        return Err(bad("house, price, surface and description are required"));
    };

    if price < 0.0 || surface < 0 {
        return Err(bad("Price and surface must be positive"));
    }
    let house = house.trim().to_string();
    let description = description.trim().to_string();
    if house.is_empty() || description.is_empty() {
        return Err(bad("Name and description must not be empty"));
    }

    Ok(ValidListing {
        house,
        price,
        surface,
        description,
        category: category(obj)?.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
    })
}

pub fn validate_update(obj: &JsonObject) -> Result<ListingChanges, ApiError> {
    let mut changes = ListingChanges::default();

    if let Some(house) = fields::text(obj, "house")? {
        let house = house.trim();
        if house.is_empty() {
            return Err(bad("Name must not be empty"));
        }
        changes.house = Some(house.to_string());
    }

    if let Some(price) = fields::number(obj, "price").map_err(|_| bad("Price must be a number"))? {
        if price < 0.0 {
            return Err(bad("Price must be positive"));
        }
        changes.price = Some(price);
    }

    if let Some(surface) = fields::integer(obj, "surface").map_err(|_| bad("surface must be an integer"))? {
        if surface < 0 {
            return Err(bad("surface must be positive"));
        }
        changes.surface = Some(surface);
    }

    if let Some(description) = fields::text(obj, "description")? {
        let description = description.trim();
        if description.is_empty() {
            return Err(bad("Description must not be empty"));
        }
        changes.description = Some(description.to_string());
    }

    changes.category = category(obj)?;
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn obj(v: Value) -> JsonObject {
        v.as_object().cloned().unwrap()
    }

    fn message(e: ApiError) -> String {
        match e {
            ApiError::BadRequest(m) => m,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn create_coerces_and_defaults_category() {
        let v = validate_create(&obj(json!({
            "house": "Cozy Cabin", "price": "120000", "surface": 80, "description": "Nice"
        })))
        .unwrap();
        assert_eq!(v.price, 120000.0);
        assert_eq!(v.surface, 80);
        assert_eq!(v.category, "Others");
    }

    #[test]
    fn create_requires_fields() {
        let e = validate_create(&obj(json!({ "house": "X", "price": 1, "surface": 1 }))).unwrap_err();
        assert!(matches!(e, ApiError::BadRequest(_)));
        let e = validate_create(&obj(json!({ "house": "", "price": 1, "surface": 1, "description": "d" }))).unwrap_err();
        assert!(matches!(e, ApiError::BadRequest(_)));
    }

    #[test]
    fn create_messages() {
        let base = json!({ "house": "X", "price": 1, "surface": 1, "description": "d" });

        let mut v = base.clone();
        v["price"] = json!("abc");
        assert_eq!(message(validate_create(&obj(v)).unwrap_err()), "Price and surface must be numbers");

        let mut v = base.clone();
        v["surface"] = json!(-1);
        assert_eq!(message(validate_create(&obj(v)).unwrap_err()), "Price and surface must be positive");

        let mut v = base;
        v["description"] = json!("   ");
        assert_eq!(message(validate_create(&obj(v)).unwrap_err()), "Name and description must not be empty");
    }

    #[test]
    fn zero_price_is_allowed() {
        let v = validate_create(&obj(json!({ "house": "X", "price": 0, "surface": 0, "description": "d" }))).unwrap();
        assert_eq!(v.price, 0.0);
    }

    #[test]
    fn fractional_surface_is_rejected() {
        let v = json!({ "house": "X", "price": 1, "surface": 80.5, "description": "d" });
        assert_eq!(message(validate_create(&obj(v)).unwrap_err()), "Price and surface must be numbers");
        assert_eq!(
            message(validate_update(&obj(json!({ "surface": 80.5 }))).unwrap_err()),
            "surface must be an integer"
        );
        let v = validate_create(&obj(json!({ "house": "X", "price": 1, "surface": 80.0, "description": "d" }))).unwrap();
        assert_eq!(v.surface, 80);
    }

    #[test]
    fn update_keeps_only_present_fields() {
        let c = validate_update(&obj(json!({ "price": "99.5", "house": "", "category": "Loft" }))).unwrap();
        assert_eq!(
            c,
            ListingChanges { price: Some(99.5), category: Some("Loft".into()), ..Default::default() }
        );
        assert_eq!(validate_update(&obj(json!({}))).unwrap(), ListingChanges::default());
    }

    #[test]
    fn update_messages() {
        assert_eq!(message(validate_update(&obj(json!({ "house": "  " }))).unwrap_err()), "Name must not be empty");
        assert_eq!(message(validate_update(&obj(json!({ "price": "x" }))).unwrap_err()), "Price must be a number");
        assert_eq!(message(validate_update(&obj(json!({ "price": -2 }))).unwrap_err()), "Price must be positive");
        assert_eq!(message(validate_update(&obj(json!({ "surface": 1.5 }))).unwrap_err()), "surface must be an integer");
        assert_eq!(message(validate_update(&obj(json!({ "surface": -3 }))).unwrap_err()), "surface must be positive");
        assert_eq!(message(validate_update(&obj(json!({ "description": " " }))).unwrap_err()), "Description must not be empty");
    }
}
