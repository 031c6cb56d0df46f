//! Lenient coercion of JSON request fields.
//!
//! Clients send numbers either as JSON numbers or as numeric strings
//! (`"150.5"`). A field counts as absent when it is missing, `null`, or the
//! empty string.

use serde_json::{Map, Value};
use thiserror::Error;

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("{0} must be a string")]
    NotText(String),
    #[error("{0} must be a number")]
    NotNumber(String),
    #[error("{0} must be an integer")]
    NotInteger(String),
}

/// Parse a request body into a JSON object.
pub fn json_object(body: &[u8]) -> Result<JsonObject, FieldError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(FieldError::NotAnObject),
    }
}

fn present<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a Value> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => Some(v),
    }
}

pub fn text(obj: &JsonObject, key: &str) -> Result<Option<String>, FieldError> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FieldError::NotText(key.to_string())),
    }
}

pub fn number(obj: &JsonObject, key: &str) -> Result<Option<f64>, FieldError> {
    let parsed = match present(obj, key) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(FieldError::NotNumber(key.to_string())),
    }
}

pub fn integer(obj: &JsonObject, key: &str) -> Result<Option<i64>, FieldError> {
    let parsed = match present(obj, key) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    parsed.map(Some).ok_or_else(|| FieldError::NotInteger(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> JsonObject {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn absent_covers_missing_null_and_empty() {
        let o = obj(json!({ "a": null, "b": "" }));
        assert_eq!(text(&o, "a"), Ok(None));
        assert_eq!(text(&o, "b"), Ok(None));
        assert_eq!(number(&o, "missing"), Ok(None));
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let o = obj(json!({ "price": "150.5", "surface": "80", "n": 12, "f": 80.0 }));
        assert_eq!(number(&o, "price"), Ok(Some(150.5)));
        assert_eq!(integer(&o, "surface"), Ok(Some(80)));
        assert_eq!(number(&o, "n"), Ok(Some(12.0)));
        assert_eq!(integer(&o, "f"), Ok(Some(80)));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let o = obj(json!({ "price": "cheap", "surface": "80.5", "flag": true, "inf": "inf" }));
        assert_eq!(number(&o, "price"), Err(FieldError::NotNumber("price".into())));
        assert_eq!(integer(&o, "surface"), Err(FieldError::NotInteger("surface".into())));
        assert!(number(&o, "flag").is_err());
        assert!(number(&o, "inf").is_err());
    }

    #[test]
    fn body_must_be_an_object() {
        assert!(json_object(br#"{"name":"x"}"#).is_ok());
        assert_eq!(json_object(b"[1,2]"), Err(FieldError::NotAnObject));
        assert_eq!(json_object(b"not json"), Err(FieldError::NotAnObject));
    }
}
