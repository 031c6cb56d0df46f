use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller type allowed to create, update and delete listings.
pub const OWNER: &str = "owner";

/// Claim set carried by a token. Anything besides `username` and `type`
/// (including `iat`/`exp`) lands in `extra`. A token without `type` is valid
/// but never an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    pub fn new(username: impl Into<String>, kind: impl Into<String>) -> Self {
        Self { username: username.into(), kind: kind.into(), extra: Map::new() }
    }

    pub fn is_owner(&self) -> bool {
        self.kind == OWNER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_claims_round_trip_through_flatten() {
        let json = serde_json::json!({ "username": "bob", "type": "owner", "team": "blue" });
        let claims: TokenClaims = serde_json::from_value(json.clone()).unwrap();
        assert!(claims.is_owner());
        assert_eq!(claims.extra.get("team"), Some(&Value::from("blue")));
        assert_eq!(serde_json::to_value(&claims).unwrap(), json);
    }

    #[test]
    fn missing_type_is_not_an_owner() {
        let claims: TokenClaims = serde_json::from_value(serde_json::json!({ "username": "alice" })).unwrap();
        assert_eq!(claims.kind, "");
        assert!(!claims.is_owner());
        assert_eq!(serde_json::to_value(&claims).unwrap(), serde_json::json!({ "username": "alice" }));
    }

    #[test]
    fn non_owner_type() {
        assert!(!TokenClaims::new("carol", "buyer").is_owner());
    }
}
