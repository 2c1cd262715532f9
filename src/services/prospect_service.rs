use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

use crate::entities::{
    FacilityType, ProspectStatus, ad_code_entity as ad_codes, lead_source_entity as lead_sources,
    profile_entity as profiles, prospect_entity as prospects,
    rejection_reason_entity as rejection_reasons, service_entity as services,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::reports::{ScopeMatch, is_paid_channel};
use crate::services::ReportSettings;
use crate::store::RecordStore;
use crate::utils::{format_whatsapp_number, normalize_whatsapp_number};

fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::required(field))
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::required(field)),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Form values after every rule has been applied.
#[derive(Debug)]
struct ProspectFields {
    entry_date: DateTime<Utc>,
    prospect_name: String,
    whatsapp_number: String,
    facility_name: String,
    facility_type: FacilityType,
    province: String,
    city: String,
    lead_source_id: Uuid,
    ad_code_id: Option<Uuid>,
    ad_id: Option<String>,
    service_id: Uuid,
    status: ProspectStatus,
    rejection_reason_id: Option<Uuid>,
    rejection_note: Option<String>,
}

#[derive(Clone)]
pub struct ProspectService {
    pool: DatabaseConnection,
    store: RecordStore,
    settings: ReportSettings,
}

impl ProspectService {
    pub fn new(pool: DatabaseConnection, store: RecordStore, settings: ReportSettings) -> Self {
        Self {
            pool,
            store,
            settings,
        }
    }

    /// Scoped, period-filtered and searched list, newest entry first.
    pub async fn list(
        &self,
        user: &CurrentUser,
        query: &ProspectQuery,
    ) -> AppResult<PaginatedResponse<ProspectRecord>> {
        let snapshot = self.store.snapshot().await;
        let mut matched = self
            .settings
            .select(&snapshot.records, user, &query.report_query(), Utc::now());

        if let Some(status) = query.status {
            matched.retain(|r| r.status == status);
        }
        if let Some(needle) = query.q.as_deref().map(|q| q.trim().to_lowercase())
            && !needle.is_empty()
        {
            // Numbers are stored as 62..., so "0812..." is also tried in that form
            let digits: String = needle.chars().filter(|c| c.is_ascii_digit()).collect();
            let international = format_whatsapp_number(&digits);
            matched.retain(|r| {
                r.prospect_name.to_lowercase().contains(&needle)
                    || r.facility_name.to_lowercase().contains(&needle)
                    || (!digits.is_empty()
                        && (r.whatsapp_number.contains(&digits)
                            || r.whatsapp_number.contains(&international)))
            });
        }
        matched.sort_by(|a, b| {
            b.entry_date
                .cmp(&a.entry_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let records: Vec<ProspectRecord> = matched.into_iter().cloned().collect();
        Ok(PaginationParams::new(query.page, query.page_size).paginate(&records))
    }

    pub async fn get(&self, user: &CurrentUser, id: Uuid) -> AppResult<ProspectRecord> {
        let snapshot = self.store.snapshot().await;
        snapshot
            .record(id)
            .filter(|r| crate::reports::is_visible(r, user, self.settings.scope_match))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Prospect not found".to_string()))
    }

    pub async fn create(
        &self,
        user: &CurrentUser,
        request: ProspectRequest,
    ) -> AppResult<ProspectRecord> {
        let requested_assignee = request.assigned_to;
        let fields = self.validate(request).await?;

        let assigned_to = match requested_assignee {
            Some(id) if user.is_admin() && id != user.id => {
                self.ensure_profile(id).await?;
                id
            }
            _ => user.id,
        };

        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = prospects::ActiveModel {
            id: Set(id),
            entry_date: Set(fields.entry_date),
            prospect_name: Set(fields.prospect_name),
            whatsapp_number: Set(fields.whatsapp_number),
            facility_name: Set(fields.facility_name),
            facility_type: Set(fields.facility_type),
            province: Set(fields.province),
            city: Set(fields.city),
            lead_source_id: Set(fields.lead_source_id),
            ad_code_id: Set(fields.ad_code_id),
            ad_id: Set(fields.ad_id),
            service_id: Set(fields.service_id),
            status: Set(fields.status),
            rejection_reason_id: Set(fields.rejection_reason_id),
            rejection_note: Set(fields.rejection_note),
            assigned_to: Set(Some(assigned_to)),
            created_by: Set(Some(user.id)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.pool).await?;
        log::info!("Prospect created: {id} by {}", user.id);

        self.published(id).await
    }

    /// Full replace of the editable fields. Creator and creation time are kept.
    pub async fn update(
        &self,
        user: &CurrentUser,
        id: Uuid,
        request: ProspectRequest,
    ) -> AppResult<ProspectRecord> {
        let existing = self.find_in_scope(user, id).await?;

        let current_pic = existing.assigned_to.or(existing.created_by);
        let assigned_to = match request.assigned_to {
            Some(requested) if Some(requested) != current_pic => {
                if !user.is_admin() {
                    return Err(AppError::PermissionDenied);
                }
                self.ensure_profile(requested).await?;
                Some(requested)
            }
            Some(requested) => Some(requested),
            None => existing.assigned_to,
        };
        let fields = self.validate(request).await?;

        let mut model = existing.into_active_model();
        model.entry_date = Set(fields.entry_date);
        model.prospect_name = Set(fields.prospect_name);
        model.whatsapp_number = Set(fields.whatsapp_number);
        model.facility_name = Set(fields.facility_name);
        model.facility_type = Set(fields.facility_type);
        model.province = Set(fields.province);
        model.city = Set(fields.city);
        model.lead_source_id = Set(fields.lead_source_id);
        model.ad_code_id = Set(fields.ad_code_id);
        model.ad_id = Set(fields.ad_id);
        model.service_id = Set(fields.service_id);
        model.status = Set(fields.status);
        model.rejection_reason_id = Set(fields.rejection_reason_id);
        model.rejection_note = Set(fields.rejection_note);
        model.assigned_to = Set(assigned_to);
        model.updated_at = Set(Utc::now());
        model.update(&self.pool).await?;
        log::info!("Prospect updated: {id} by {}", user.id);

        self.published(id).await
    }

    pub async fn delete(&self, user: &CurrentUser, id: Uuid) -> AppResult<()> {
        self.find_in_scope(user, id).await?;
        prospects::Entity::delete_by_id(id).exec(&self.pool).await?;
        log::info!("Prospect deleted: {id} by {}", user.id);

        self.store.refresh().await?;
        Ok(())
    }

    /// Refresh the store and return the freshly denormalised record.
    async fn published(&self, id: Uuid) -> AppResult<ProspectRecord> {
        let snapshot = self.store.refresh().await?;
        snapshot
            .record(id)
            .cloned()
            .ok_or_else(|| AppError::InternalError(format!("Prospect {id} missing after refresh")))
    }

    /// Load a row and check the caller may touch it. Out-of-scope rows look missing.
    async fn find_in_scope(&self, user: &CurrentUser, id: Uuid) -> AppResult<prospects::Model> {
        let not_found = || AppError::NotFound("Prospect not found".to_string());
        let model = prospects::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(not_found)?;
        if user.is_admin() {
            return Ok(model);
        }

        let visible = match self.settings.scope_match {
            ScopeMatch::UserId => {
                model.assigned_to == Some(user.id) || model.created_by == Some(user.id)
            }
            ScopeMatch::FullName => match model.assigned_to {
                Some(assignee) => profiles::Entity::find_by_id(assignee)
                    .one(&self.pool)
                    .await?
                    .is_some_and(|p| p.full_name == user.full_name),
                None => false,
            },
        };
        if visible { Ok(model) } else { Err(not_found()) }
    }

    async fn ensure_profile(&self, id: Uuid) -> AppResult<()> {
        profiles::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::ValidationError("assigned_to does not exist".to_string()))
    }

    /// Apply the form rules in order; the first failing field is reported.
    async fn validate(&self, request: ProspectRequest) -> AppResult<ProspectFields> {
        let entry_date = required(request.entry_date, "entry_date")?;
        let prospect_name = required_text(request.prospect_name, "prospect_name")?;
        let whatsapp_number = required_text(request.whatsapp_number, "whatsapp_number")?;
        let facility_name = required_text(request.facility_name, "facility_name")?;
        let facility_type = required(request.facility_type, "facility_type")?;
        let province = required_text(request.province, "province")?;
        let city = required_text(request.city, "city")?;
        let lead_source_id = required(request.lead_source_id, "lead_source_id")?;
        let service_id = required(request.service_id, "service_id")?;
        let status = required(request.status, "status")?;

        let whatsapp_number = normalize_whatsapp_number(&whatsapp_number)?;

        let lead_source = lead_sources::Entity::find_by_id(lead_source_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ValidationError("lead_source_id does not exist".to_string()))?;

        let (ad_code_id, ad_id) = if is_paid_channel(&lead_source.name) {
            let ad_code_id = required(request.ad_code_id, "ad_code_id")?;
            if ad_codes::Entity::find_by_id(ad_code_id)
                .one(&self.pool)
                .await?
                .is_none()
            {
                return Err(AppError::ValidationError(
                    "ad_code_id does not exist".to_string(),
                ));
            }
            (Some(ad_code_id), optional_text(request.ad_id))
        } else {
            (None, None)
        };

        if services::Entity::find_by_id(service_id)
            .one(&self.pool)
            .await?
            .is_none()
        {
            return Err(AppError::ValidationError(
                "service_id does not exist".to_string(),
            ));
        }

        let (rejection_reason_id, rejection_note) = if status == ProspectStatus::NotALead {
            let reason_id = required(request.rejection_reason_id, "rejection_reason_id")?;
            let note = required_text(request.rejection_note, "rejection_note")?;
            if rejection_reasons::Entity::find_by_id(reason_id)
                .one(&self.pool)
                .await?
                .is_none()
            {
                return Err(AppError::ValidationError(
                    "rejection_reason_id does not exist".to_string(),
                ));
            }
            (Some(reason_id), Some(note))
        } else {
            (None, None)
        };

        Ok(ProspectFields {
            entry_date,
            prospect_name,
            whatsapp_number,
            facility_name,
            facility_type,
            province,
            city,
            lead_source_id,
            ad_code_id,
            ad_id,
            service_id,
            status,
            rejection_reason_id,
            rejection_note,
        })
    }
}
