use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pipeline status of a prospect.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum ProspectStatus {
    #[sea_orm(string_value = "prospect")]
    Prospect,
    #[sea_orm(string_value = "contacted")]
    Contacted,
    #[sea_orm(string_value = "lead")]
    Lead,
    #[sea_orm(string_value = "not_a_lead")]
    NotALead,
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
}

impl ProspectStatus {
    pub const ALL: [ProspectStatus; 5] = [
        ProspectStatus::Prospect,
        ProspectStatus::Contacted,
        ProspectStatus::Lead,
        ProspectStatus::NotALead,
        ProspectStatus::Ongoing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProspectStatus::Prospect => "Prospect",
            ProspectStatus::Contacted => "Contacted",
            ProspectStatus::Lead => "Lead",
            ProspectStatus::NotALead => "Not a Lead",
            ProspectStatus::Ongoing => "Ongoing",
        }
    }
}

impl std::fmt::Display for ProspectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProspectStatus::Prospect => write!(f, "prospect"),
            ProspectStatus::Contacted => write!(f, "contacted"),
            ProspectStatus::Lead => write!(f, "lead"),
            ProspectStatus::NotALead => write!(f, "not_a_lead"),
            ProspectStatus::Ongoing => write!(f, "ongoing"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    #[sea_orm(string_value = "hospital")]
    Hospital,
    #[sea_orm(string_value = "clinic")]
    Clinic,
    #[sea_orm(string_value = "puskesmas")]
    Puskesmas,
    #[sea_orm(string_value = "laboratory")]
    Laboratory,
    #[sea_orm(string_value = "pharmacy")]
    Pharmacy,
    #[sea_orm(string_value = "independent_practice")]
    IndependentPractice,
    #[sea_orm(string_value = "other")]
    Other,
}

impl FacilityType {
    pub const ALL: [FacilityType; 7] = [
        FacilityType::Hospital,
        FacilityType::Clinic,
        FacilityType::Puskesmas,
        FacilityType::Laboratory,
        FacilityType::Pharmacy,
        FacilityType::IndependentPractice,
        FacilityType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FacilityType::Hospital => "Rumah Sakit",
            FacilityType::Clinic => "Klinik",
            FacilityType::Puskesmas => "Puskesmas",
            FacilityType::Laboratory => "Laboratorium",
            FacilityType::Pharmacy => "Apotek",
            FacilityType::IndependentPractice => "Praktik Mandiri",
            FacilityType::Other => "Lainnya",
        }
    }
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacilityType::Hospital => write!(f, "hospital"),
            FacilityType::Clinic => write!(f, "clinic"),
            FacilityType::Puskesmas => write!(f, "puskesmas"),
            FacilityType::Laboratory => write!(f, "laboratory"),
            FacilityType::Pharmacy => write!(f, "pharmacy"),
            FacilityType::IndependentPractice => write!(f, "independent_practice"),
            FacilityType::Other => write!(f, "other"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "prospects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_date: DateTime<Utc>,
    pub prospect_name: String,
    pub whatsapp_number: String,
    pub facility_name: String,
    pub facility_type: FacilityType,
    pub province: String,
    pub city: String,
    pub lead_source_id: Uuid,
    pub ad_code_id: Option<Uuid>,
    pub ad_id: Option<String>,
    pub service_id: Uuid,
    pub status: ProspectStatus,
    pub rejection_reason_id: Option<Uuid>,
    pub rejection_note: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
