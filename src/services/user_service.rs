use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{UserRole, profile_entity as profiles};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::require_admin;
use crate::store::RecordStore;
use crate::utils::{hash_password, validate_password};

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate and insert a profile. Emails are stored lower-cased and must be unique.
pub(crate) async fn insert_profile(
    pool: &DatabaseConnection,
    full_name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> AppResult<profiles::Model> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::required("full_name"));
    }
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::required("email"));
    }
    if !email.contains('@') {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    validate_password(password)?;

    let existing = profiles::Entity::find()
        .filter(profiles::Column::Email.eq(email.as_str()))
        .one(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::ValidationError("Email is already registered".to_string()));
    }

    let now = Utc::now();
    let model = profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(full_name.to_string()),
        email: Set(email),
        password_hash: Set(hash_password(password)?),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(pool).await?)
}

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    store: RecordStore,
}

impl UserService {
    pub fn new(pool: DatabaseConnection, store: RecordStore) -> Self {
        Self { pool, store }
    }

    pub async fn me(&self, user: &CurrentUser) -> AppResult<UserProfile> {
        profiles::Entity::find_by_id(user.id)
            .one(&self.pool)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// All profiles by name; feeds the PIC picker.
    pub async fn list(&self, user: &CurrentUser) -> AppResult<Vec<UserProfile>> {
        require_admin(user)?;
        let users = profiles::Entity::find()
            .order_by_asc(profiles::Column::FullName)
            .all(&self.pool)
            .await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn create(
        &self,
        user: &CurrentUser,
        request: CreateUserRequest,
    ) -> AppResult<UserProfile> {
        require_admin(user)?;
        let profile = insert_profile(
            &self.pool,
            &request.full_name,
            &request.email,
            &request.password,
            request.role,
        )
        .await?;
        log::info!("User created: {} ({})", profile.email, profile.role);

        self.store.refresh().await?;
        Ok(UserProfile::from(profile))
    }
}
