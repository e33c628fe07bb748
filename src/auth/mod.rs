use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Access level carried in the token. Anything other than "admin" is a
/// regular user; admins see every row regardless of ownership.
pub const ACCESS_ADMIN: &str = "admin";
pub const ACCESS_USER: &str = "user";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub access: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, access: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            access,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// The authenticated principal resolved from a bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub access: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.access == ACCESS_ADMIN
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            access: claims.access,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

pub fn mint_token(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_token(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_and_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "kaede@example.com".into(), ACCESS_USER.into());

        let token = mint_token(&claims).expect("mint");
        let verified = verify_token(&token).expect("verify");

        assert_eq!(verified.sub, user_id);
        assert_eq!(verified.email, "kaede@example.com");
        assert_eq!(verified.access, ACCESS_USER);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            verify_token("not.a.jwt"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@example.com".into(), ACCESS_USER.into());
        let mut token = mint_token(&claims).expect("mint");
        // Flip a character in the signature segment
        token.pop();
        token.push('A');
        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn admin_flag_follows_access_claim() {
        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            email: "ops@example.com".into(),
            access: ACCESS_ADMIN.into(),
        };
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "u@example.com".into(),
            access: ACCESS_USER.into(),
        };
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }
}
