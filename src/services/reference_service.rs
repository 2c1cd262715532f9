use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, Func, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::entities::{
    FacilityType, ProspectStatus, lead_source_entity as lead_sources, prospect_entity as prospects,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::reports::is_paid_channel;
use crate::services::require_admin;
use crate::store::RecordStore;

fn prospect_column(table: ReferenceTable) -> prospects::Column {
    match table {
        ReferenceTable::LeadSource => prospects::Column::LeadSourceId,
        ReferenceTable::AdCode => prospects::Column::AdCodeId,
        ReferenceTable::Service => prospects::Column::ServiceId,
        ReferenceTable::RejectionReason => prospects::Column::RejectionReasonId,
    }
}

fn clean_display_name(table: ReferenceTable, raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::required(table.display_field()));
    }
    if name.chars().count() > 255 {
        return Err(AppError::ValidationError(format!(
            "{} must be at most 255 characters",
            table.display_field()
        )));
    }
    Ok(name.to_string())
}

/// Insert one reference row. The table tag decides the target table and display column.
pub async fn insert_reference_row<C: ConnectionTrait>(
    db: &C,
    table: ReferenceTable,
    id: Uuid,
    display_name: &str,
) -> AppResult<()> {
    let mut stmt = Query::insert();
    stmt.into_table(Alias::new(table.table_name())).columns([
        Alias::new("id"),
        Alias::new(table.display_field()),
        Alias::new("created_at"),
    ]);
    stmt.values([id.into(), display_name.into(), Utc::now().into()])
        .map_err(|e| AppError::InternalError(format!("Failed to build insert: {e}")))?;

    let backend = db.get_database_backend();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

#[derive(Clone)]
pub struct ReferenceService {
    pool: DatabaseConnection,
    store: RecordStore,
}

impl ReferenceService {
    pub fn new(pool: DatabaseConnection, store: RecordStore) -> Self {
        Self { pool, store }
    }

    /// Items of one table in stored order (creation time, then name).
    pub async fn list(&self, table: ReferenceTable) -> Vec<ReferenceItem> {
        self.store.snapshot().await.reference.items(table).to_vec()
    }

    pub async fn create(
        &self,
        user: &CurrentUser,
        table: ReferenceTable,
        request: ReferenceRequest,
    ) -> AppResult<ReferenceItem> {
        require_admin(user)?;
        let display_name = clean_display_name(table, &request.display_name)?;
        self.ensure_unique(table, &display_name, None).await?;

        let id = Uuid::new_v4();
        insert_reference_row(&self.pool, table, id, &display_name).await?;
        log::info!("{} created: {display_name} ({id})", table.label());

        self.store.refresh().await?;
        Ok(ReferenceItem { id, display_name })
    }

    pub async fn update(
        &self,
        user: &CurrentUser,
        table: ReferenceTable,
        id: Uuid,
        request: ReferenceRequest,
    ) -> AppResult<ReferenceItem> {
        require_admin(user)?;
        let display_name = clean_display_name(table, &request.display_name)?;
        self.ensure_unique(table, &display_name, Some(id)).await?;
        if matches!(table, ReferenceTable::LeadSource) {
            self.ensure_channel_kept(id, &display_name).await?;
        }

        let mut stmt = Query::update();
        stmt.table(Alias::new(table.table_name()))
            .value(Alias::new(table.display_field()), display_name.as_str())
            .and_where(Expr::col(Alias::new("id")).eq(id));

        let backend = self.pool.get_database_backend();
        let result = self.pool.execute(backend.build(&stmt)).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} not found", table.label())));
        }
        log::info!("{} renamed: {display_name} ({id})", table.label());

        self.store.refresh().await?;
        Ok(ReferenceItem { id, display_name })
    }

    /// Remove a row that no prospect points at.
    pub async fn delete(&self, user: &CurrentUser, table: ReferenceTable, id: Uuid) -> AppResult<()> {
        require_admin(user)?;

        let in_use = self.usage(table, id).await?;
        if in_use > 0 {
            return Err(AppError::ValidationError(format!(
                "{} is still used by {in_use} prospect(s)",
                table.label()
            )));
        }

        let mut stmt = Query::delete();
        stmt.from_table(Alias::new(table.table_name()))
            .and_where(Expr::col(Alias::new("id")).eq(id));

        let backend = self.pool.get_database_backend();
        let result = self.pool.execute(backend.build(&stmt)).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} not found", table.label())));
        }
        log::info!("{} deleted: {id}", table.label());

        self.store.refresh().await?;
        Ok(())
    }

    pub fn facility_types() -> Vec<EnumOption> {
        FacilityType::ALL
            .iter()
            .map(|t| EnumOption {
                value: t.to_string(),
                label: t.label().to_string(),
            })
            .collect()
    }

    pub fn statuses() -> Vec<EnumOption> {
        ProspectStatus::ALL
            .iter()
            .map(|s| EnumOption {
                value: s.to_string(),
                label: s.label().to_string(),
            })
            .collect()
    }

    async fn usage(&self, table: ReferenceTable, id: Uuid) -> AppResult<u64> {
        Ok(prospects::Entity::find()
            .filter(prospect_column(table).eq(id))
            .count(&self.pool)
            .await?)
    }

    /// A lead source in use may not be renamed across the paid/organic line:
    /// its prospects' ad fields were validated against the old channel.
    async fn ensure_channel_kept(&self, id: Uuid, display_name: &str) -> AppResult<()> {
        let Some(current) = lead_sources::Entity::find_by_id(id).one(&self.pool).await? else {
            return Ok(());
        };
        if is_paid_channel(&current.name) == is_paid_channel(display_name) {
            return Ok(());
        }

        let in_use = self.usage(ReferenceTable::LeadSource, id).await?;
        if in_use > 0 {
            log::warn!(
                "Refused rename of lead source {id}: \"{}\" -> \"{display_name}\" changes channel",
                current.name
            );
            return Err(AppError::ValidationError(format!(
                "Lead source \"{}\" is used by {in_use} prospect(s) and cannot switch between paid and organic",
                current.name
            )));
        }
        Ok(())
    }

    async fn ensure_unique(
        &self,
        table: ReferenceTable,
        display_name: &str,
        except: Option<Uuid>,
    ) -> AppResult<()> {
        let mut stmt = Query::select();
        stmt.column(Alias::new("id"))
            .from(Alias::new(table.table_name()))
            .and_where(
                Expr::expr(Func::lower(Expr::col(Alias::new(table.display_field()))))
                    .eq(display_name.to_lowercase()),
            );
        if let Some(id) = except {
            stmt.and_where(Expr::col(Alias::new("id")).ne(id));
        }

        let backend = self.pool.get_database_backend();
        let clashes = self.pool.query_all(backend.build(&stmt)).await?;
        if !clashes.is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} \"{display_name}\" already exists",
                table.label()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::test_utils::*;

    async fn setup() -> (ReferenceService, DatabaseConnection, CurrentUser, CurrentUser) {
        let db = setup_test_db().await.unwrap();
        let admin = create_test_profile(&db, "Admin", UserRole::Admin).await.unwrap();
        let cs = create_test_profile(&db, "Siti", UserRole::CsSupport).await.unwrap();
        let store = RecordStore::new(db.clone());
        let service = ReferenceService::new(db.clone(), store);
        let as_current = |p: &crate::entities::profile_entity::Model| CurrentUser {
            id: p.id,
            full_name: p.full_name.clone(),
            role: p.role,
        };
        (service, db, as_current(&admin), as_current(&cs))
    }

    fn req(name: &str) -> ReferenceRequest {
        ReferenceRequest {
            display_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_lists() {
        let (service, _db, admin, _) = setup().await;
        let item = service
            .create(&admin, ReferenceTable::AdCode, req("  MA-01 "))
            .await
            .unwrap();
        assert_eq!(item.display_name, "MA-01");

        let listed = service.list(ReferenceTable::AdCode).await;
        assert_eq!(listed, vec![item]);
        assert!(service.list(ReferenceTable::LeadSource).await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_and_blank_rejected() {
        let (service, _db, admin, _) = setup().await;
        service
            .create(&admin, ReferenceTable::LeadSource, req("Meta Ads"))
            .await
            .unwrap();

        let dup = service
            .create(&admin, ReferenceTable::LeadSource, req("meta ads"))
            .await;
        assert!(matches!(dup, Err(AppError::ValidationError(_))));

        let blank = service
            .create(&admin, ReferenceTable::LeadSource, req("   "))
            .await;
        assert!(matches!(blank, Err(AppError::ValidationError(m)) if m == "name is required"));

        // Same name in another table is fine
        assert!(
            service
                .create(&admin, ReferenceTable::Service, req("Meta Ads"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_cs_support_cannot_mutate() {
        let (service, _db, _, cs) = setup().await;
        let result = service
            .create(&cs, ReferenceTable::Service, req("SIMRS"))
            .await;
        assert!(matches!(result, Err(AppError::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_rename_and_keep_own_name() {
        let (service, _db, admin, _) = setup().await;
        let item = service
            .create(&admin, ReferenceTable::Service, req("SIMRS"))
            .await
            .unwrap();

        // Renaming to its own name in another case is not a clash with itself
        let renamed = service
            .update(&admin, ReferenceTable::Service, item.id, req("simrs"))
            .await
            .unwrap();
        assert_eq!(renamed.display_name, "simrs");
        assert_eq!(service.list(ReferenceTable::Service).await[0].display_name, "simrs");

        let missing = service
            .update(&admin, ReferenceTable::Service, Uuid::new_v4(), req("RME"))
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_refuses_referenced_rows() {
        let (service, db, admin, _) = setup().await;
        let source = service
            .create(&admin, ReferenceTable::LeadSource, req("Referral"))
            .await
            .unwrap();
        let unused = service
            .create(&admin, ReferenceTable::LeadSource, req("Event"))
            .await
            .unwrap();
        let svc = create_test_reference(&db, ReferenceTable::Service, "SIMRS")
            .await
            .unwrap();
        insert_test_prospect(&db, source.id, svc, ProspectStatus::Lead, Some(admin.id))
            .await
            .unwrap();

        let refused = service
            .delete(&admin, ReferenceTable::LeadSource, source.id)
            .await;
        assert!(matches!(refused, Err(AppError::ValidationError(_))));

        service
            .delete(&admin, ReferenceTable::LeadSource, unused.id)
            .await
            .unwrap();
        let names: Vec<_> = service
            .list(ReferenceTable::LeadSource)
            .await
            .into_iter()
            .map(|i| i.display_name)
            .collect();
        assert_eq!(names, vec!["Referral"]);
    }

    #[tokio::test]
    async fn test_rename_cannot_flip_channel_while_in_use() {
        let (service, db, admin, _) = setup().await;
        let meta = service
            .create(&admin, ReferenceTable::LeadSource, req("Meta Ads"))
            .await
            .unwrap();
        let referral = service
            .create(&admin, ReferenceTable::LeadSource, req("Referral"))
            .await
            .unwrap();
        let svc = create_test_reference(&db, ReferenceTable::Service, "SIMRS")
            .await
            .unwrap();
        insert_test_prospect(&db, meta.id, svc, ProspectStatus::Lead, Some(admin.id))
            .await
            .unwrap();

        let flipped = service
            .update(&admin, ReferenceTable::LeadSource, meta.id, req("Meta"))
            .await;
        assert!(matches!(flipped, Err(AppError::ValidationError(_))));
        assert_eq!(
            service.list(ReferenceTable::LeadSource).await[0].display_name,
            "Meta Ads"
        );

        // Staying on the paid side is fine
        let renamed = service
            .update(&admin, ReferenceTable::LeadSource, meta.id, req("Meta Ads ID"))
            .await
            .unwrap();
        assert_eq!(renamed.display_name, "Meta Ads ID");

        // Unused sources may change channel
        assert!(
            service
                .update(&admin, ReferenceTable::LeadSource, referral.id, req("Referral Ads"))
                .await
                .is_ok()
        );
    }

    #[test]
    fn test_enum_options() {
        let types = ReferenceService::facility_types();
        assert_eq!(types.len(), 7);
        assert_eq!(types[0].value, "hospital");
        assert_eq!(types[0].label, "Rumah Sakit");

        let statuses = ReferenceService::statuses();
        let values: Vec<_> = statuses.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["prospect", "contacted", "lead", "not_a_lead", "ongoing"]);
    }
}
