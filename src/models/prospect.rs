use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{FacilityType, ProspectStatus};
use crate::models::ReportQuery;
use crate::reports::{DateBasis, Period};

/// Lightweight reference to a dashboard user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UserRef {
    pub id: Uuid,
    pub full_name: String,
}

/// A prospect with every reference already resolved to its display name.
///
/// This is the flat shape the reporting layer works on; the store builds it
/// from the raw rows after each refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ProspectRecord {
    pub id: Uuid,
    pub entry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(example = "dr. Rina")]
    pub prospect_name: String,
    #[schema(example = "6281234567890")]
    pub whatsapp_number: String,
    #[schema(example = "Klinik Sehat Sentosa")]
    pub facility_name: String,
    pub facility_type: FacilityType,
    pub province: String,
    pub city: String,
    pub status: ProspectStatus,
    pub lead_source_id: Uuid,
    #[schema(example = "Meta Ads")]
    pub lead_source: String,
    pub ad_code_id: Option<Uuid>,
    pub ad_code: Option<String>,
    pub ad_id: Option<String>,
    pub service_id: Uuid,
    pub service: String,
    pub rejection_reason_id: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub rejection_note: Option<String>,
    pub assigned_to: Option<UserRef>,
    pub created_by: Option<UserRef>,
}

impl ProspectRecord {
    /// Person in charge: the assignee, or the creator when nobody is assigned.
    pub fn pic(&self) -> Option<&UserRef> {
        self.assigned_to.as_ref().or(self.created_by.as_ref())
    }

    pub fn is_lead(&self) -> bool {
        self.status == ProspectStatus::Lead
    }
}

/// Create/edit form payload. Every field is optional on the wire so that the
/// service can report the first missing one by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProspectRequest {
    pub entry_date: Option<DateTime<Utc>>,
    #[schema(example = "dr. Rina")]
    pub prospect_name: Option<String>,
    #[schema(example = "081234567890")]
    pub whatsapp_number: Option<String>,
    pub facility_name: Option<String>,
    pub facility_type: Option<FacilityType>,
    #[schema(example = "JAWA BARAT")]
    pub province: Option<String>,
    #[schema(example = "KOTA BANDUNG")]
    pub city: Option<String>,
    pub lead_source_id: Option<Uuid>,
    pub ad_code_id: Option<Uuid>,
    pub ad_id: Option<String>,
    pub service_id: Option<Uuid>,
    pub status: Option<ProspectStatus>,
    pub rejection_reason_id: Option<Uuid>,
    pub rejection_note: Option<String>,
    /// Honoured for admins only; everyone else always owns what they create.
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProspectQuery {
    pub period: Option<Period>,
    /// Custom range start (YYYY-MM-DD, inclusive)
    pub from: Option<NaiveDate>,
    /// Custom range end (YYYY-MM-DD, inclusive)
    pub to: Option<NaiveDate>,
    pub date_basis: Option<DateBasis>,
    pub status: Option<ProspectStatus>,
    /// Case-insensitive match on prospect name, facility name or WhatsApp number
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ProspectQuery {
    pub fn report_query(&self) -> ReportQuery {
        ReportQuery {
            period: self.period,
            from: self.from,
            to: self.to,
            date_basis: self.date_basis,
        }
    }
}
