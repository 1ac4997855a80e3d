use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: Role, ttl: Duration) -> Result<Self, String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| format!("Token lifetime {ttl} is out of range"))?;
        Ok(Self {
            sub: user_id,
            email,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn round_trips_identity_claims() {
        let id = Uuid::now_v7();
        let claims = Claims::new(id, "ann@x.com".into(), Role::Admin, Duration::hours(1)).unwrap();
        let token = encode_token(&claims, SECRET).unwrap();

        let decoded = decode_token(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.email, "ann@x.com");
        assert_eq!(decoded.role, Role::Admin);
    }

    #[test]
    fn rejects_wrong_secret() {
        let claims = Claims::new(Uuid::now_v7(), "a@b.c".into(), Role::User, Duration::hours(1)).unwrap();
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, "another-secret").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        // Well past the default 60s validation leeway.
        let claims = Claims::new(Uuid::now_v7(), "a@b.c".into(), Role::User, Duration::minutes(-10)).unwrap();
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        let result = Claims::new(Uuid::now_v7(), "a@b.c".into(), Role::User, Duration::MAX);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        assert!(decode_token("not.a.jwt", SECRET).is_err());
        assert!(decode_token("", SECRET).is_err());
    }
}
