use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde_json::Value;
use tracing::debug;

use super::{claims::TokenClaims, errors::TokenError};

/// Signs claim sets with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl_secs: Option<u64>,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: Option<u64>) -> Self {
        Self { key: EncodingKey::from_secret(secret.as_bytes()), ttl_secs }
    }

    /// Sign `claims`. With a TTL configured, `iat` and `exp` are stamped over
    /// whatever the caller supplied.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{TokenClaims, TokenIssuer, TokenVerifier};
    /// let token = TokenIssuer::new("mykey", None).issue(&TokenClaims::new("alice", "owner")).unwrap();
    /// let claims = TokenVerifier::new("mykey").verify(&token).unwrap();
    /// assert_eq!(claims.username, "alice");
    /// ```
    pub fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        if claims.username.trim().is_empty() {
            return Err(TokenError::MissingClaim("username"));
        }
        if claims.kind.trim().is_empty() {
            return Err(TokenError::MissingClaim("type"));
        }
        let mut claims = claims.clone();
        if let Some(ttl) = self.ttl_secs {
            let now = Utc::now().timestamp();
            claims.extra.insert("iat".into(), Value::from(now));
            claims.extra.insert("exp".into(), Value::from(now + ttl as i64));
        }
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// Checks HS256 signatures and, when present, expiry.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens issued without a TTL carry no `exp`.
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let mut claims = TokenClaims::new("alice", "owner");
        claims.extra.insert("region".into(), Value::from("north"));
        let token = TokenIssuer::new("mykey", None).issue(&claims).unwrap();
        let back = TokenVerifier::new("mykey").verify(&token).unwrap();
        assert_eq!(back, claims);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenIssuer::new("mykey", None).issue(&TokenClaims::new("alice", "owner")).unwrap();
        let err = TokenVerifier::new("other").verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(TokenVerifier::new("mykey").verify("not.a.jwt").is_err());
    }

    #[test]
    fn ttl_stamps_expiry() {
        let token = TokenIssuer::new("mykey", Some(60)).issue(&TokenClaims::new("alice", "owner")).unwrap();
        let claims = TokenVerifier::new("mykey").verify(&token).unwrap();
        let iat = claims.extra["iat"].as_i64().unwrap();
        let exp = claims.extra["exp"].as_i64().unwrap();
        assert_eq!(exp - iat, 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = TokenClaims::new("alice", "owner");
        claims.extra.insert("exp".into(), Value::from(Utc::now().timestamp() - 3600));
        let token = TokenIssuer::new("mykey", None).issue(&claims).unwrap();
        let err = TokenVerifier::new("mykey").verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn other_algorithms_are_refused() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &TokenClaims::new("alice", "owner"),
            &EncodingKey::from_secret(b"mykey"),
        )
        .unwrap();
        assert!(TokenVerifier::new("mykey").verify(&token).is_err());
    }

    #[test]
    fn token_without_type_verifies() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "username": "alice" }),
            &EncodingKey::from_secret(b"mykey"),
        )
        .unwrap();
        let claims = TokenVerifier::new("mykey").verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_owner());
    }

    #[test]
    fn blank_username_is_not_signed() {
        let err = TokenIssuer::new("mykey", None).issue(&TokenClaims::new(" ", "owner")).unwrap_err();
        assert!(matches!(err, TokenError::MissingClaim("username")));
    }
}
