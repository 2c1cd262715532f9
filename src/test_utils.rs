//! Shared helpers for database-backed tests.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::{create_pool, run_migrations};
use crate::entities::{
    FacilityType, ProspectStatus, UserRole, profile_entity as profiles,
    prospect_entity as prospects,
};
use crate::error::AppResult;
use crate::models::ReferenceTable;
use crate::services::insert_reference_row;

pub const TEST_PASSWORD: &str = "Password123";

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> AppResult<DatabaseConnection> {
    let pool = create_pool(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

pub fn test_email(full_name: &str) -> String {
    format!("{}@example.com", full_name.to_lowercase().replace(' ', "."))
}

pub async fn create_test_profile(
    db: &DatabaseConnection,
    full_name: &str,
    role: UserRole,
) -> AppResult<profiles::Model> {
    let now = Utc::now();
    let hash = bcrypt::hash(TEST_PASSWORD, 4)
        .map_err(|e| crate::AppError::InternalError(e.to_string()))?;
    let model = profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(full_name.to_string()),
        email: Set(test_email(full_name)),
        password_hash: Set(hash),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(db).await?)
}

pub async fn create_test_reference(
    db: &DatabaseConnection,
    table: ReferenceTable,
    display_name: &str,
) -> AppResult<Uuid> {
    let id = Uuid::new_v4();
    insert_reference_row(db, table, id, display_name).await?;
    Ok(id)
}

pub async fn insert_test_prospect(
    db: &DatabaseConnection,
    lead_source_id: Uuid,
    service_id: Uuid,
    status: ProspectStatus,
    assigned_to: Option<Uuid>,
) -> AppResult<prospects::Model> {
    let now = Utc::now();
    let model = prospects::ActiveModel {
        id: Set(Uuid::new_v4()),
        entry_date: Set(now),
        prospect_name: Set("dr. Rina".to_string()),
        whatsapp_number: Set("6281234567890".to_string()),
        facility_name: Set("Klinik Sehat".to_string()),
        facility_type: Set(FacilityType::Clinic),
        province: Set("JAWA BARAT".to_string()),
        city: Set("KOTA BANDUNG".to_string()),
        lead_source_id: Set(lead_source_id),
        ad_code_id: Set(None),
        ad_id: Set(None),
        service_id: Set(service_id),
        status: Set(status),
        rejection_reason_id: Set(None),
        rejection_note: Set(None),
        assigned_to: Set(assigned_to),
        created_by: Set(assigned_to),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(db).await?)
}
