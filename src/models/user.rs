use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{UserRole, profile_entity as profiles};

/// Authenticated caller, resolved from the access token by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub full_name: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    #[schema(example = "Siti Rahma")]
    pub full_name: String,
    #[schema(example = "siti@example.com")]
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<profiles::Model> for UserProfile {
    fn from(p: profiles::Model) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            role: p.role,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Siti Rahma")]
    pub full_name: String,
    #[schema(example = "siti@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    pub role: UserRole,
}
