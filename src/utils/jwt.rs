use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use crate::models::CurrentUser;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // profile id
    pub full_name: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String, // "access" or "refresh"
}

impl Claims {
    pub fn current_user(&self) -> AppResult<CurrentUser> {
        let id = Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;
        Ok(CurrentUser {
            id,
            full_name: self.full_name.clone(),
            role: self.role,
        })
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    refresh_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64, refresh_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
            refresh_token_expires_in: refresh_expires_in,
        }
    }

    fn generate(&self, user: &CurrentUser, token_type: &str, expires_in: i64) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in);

        let claims = Claims {
            sub: user.id.to_string(),
            full_name: user.full_name.clone(),
            role: user.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn generate_access_token(&self, user: &CurrentUser) -> AppResult<String> {
        self.generate(user, "access", self.access_token_expires_in)
    }

    pub fn generate_refresh_token(&self, user: &CurrentUser) -> AppResult<String> {
        self.generate(user, "refresh", self.refresh_token_expires_in)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "access" {
            return Err(AppError::AuthError("Invalid access token type".to_string()));
        }

        Ok(claims)
    }

    pub fn verify_refresh_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "refresh" {
            return Err(AppError::AuthError("Invalid refresh token type".to_string()));
        }

        Ok(claims)
    }

    pub fn get_access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn siti() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            full_name: "Siti".to_string(),
            role: UserRole::CsSupport,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let jwt = JwtService::new("secret", 60, 120);
        let user = siti();
        let token = jwt.generate_access_token(&user).unwrap();
        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.current_user().unwrap(), user);
    }

    #[test]
    fn test_token_types_not_interchangeable() {
        let jwt = JwtService::new("secret", 60, 120);
        let user = siti();
        let refresh = jwt.generate_refresh_token(&user).unwrap();
        assert!(jwt.verify_access_token(&refresh).is_err());
        assert!(jwt.verify_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new("one", 60, 120)
            .generate_access_token(&siti())
            .unwrap();
        assert!(JwtService::new("two", 60, 120).verify_access_token(&token).is_err());
    }
}
