use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::config::BootstrapAdminConfig;
use crate::entities::{UserRole, profile_entity as profiles};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_service::{insert_profile, normalize_email};
use crate::utils::*;

fn current_user(profile: &profiles::Model) -> CurrentUser {
    CurrentUser {
        id: profile.id,
        full_name: profile.full_name.clone(),
        role: profile.role,
    }
}

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        if email.is_empty() {
            return Err(AppError::required("email"));
        }

        let profile = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &profile.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        let user = current_user(&profile);
        let access_token = self.jwt_service.generate_access_token(&user)?;
        let refresh_token = self.jwt_service.generate_refresh_token(&user)?;
        log::info!("User logged in: {}", profile.email);

        Ok(AuthResponse {
            user: UserProfile::from(profile),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    /// Issue a new access token. Name and role are re-read so changes apply on refresh.
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let id = claims.current_user()?.id;

        let profile = profiles::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        let access_token = self.jwt_service.generate_access_token(&current_user(&profile))?;

        Ok(AuthResponse {
            user: UserProfile::from(profile),
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    /// Create the first admin when the profile table is empty. Returns whether one was created.
    pub async fn ensure_bootstrap_admin(
        &self,
        bootstrap: Option<&BootstrapAdminConfig>,
    ) -> AppResult<bool> {
        let existing = profiles::Entity::find().count(&self.pool).await?;
        if existing > 0 {
            return Ok(false);
        }
        let Some(admin) = bootstrap else {
            log::warn!("No profiles exist and no bootstrap admin is configured");
            return Ok(false);
        };

        let profile = insert_profile(
            &self.pool,
            &admin.full_name,
            &admin.email,
            &admin.password,
            UserRole::Admin,
        )
        .await?;
        log::info!("Bootstrap admin created: {}", profile.email);
        Ok(true)
    }
}
