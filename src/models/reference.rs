use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::UserProfile;

/// The user-editable master-data tables.
///
/// Each variant declares its own URL slug and the column that holds the
/// display value, so callers dispatch on the tag instead of probing row keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceTable {
    LeadSource,
    AdCode,
    Service,
    RejectionReason,
}

impl ReferenceTable {
    pub const ALL: [ReferenceTable; 4] = [
        ReferenceTable::LeadSource,
        ReferenceTable::AdCode,
        ReferenceTable::Service,
        ReferenceTable::RejectionReason,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ReferenceTable::LeadSource => "lead-sources",
            ReferenceTable::AdCode => "ad-codes",
            ReferenceTable::Service => "services",
            ReferenceTable::RejectionReason => "rejection-reasons",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            ReferenceTable::LeadSource => "lead_sources",
            ReferenceTable::AdCode => "ad_codes",
            ReferenceTable::Service => "services",
            ReferenceTable::RejectionReason => "rejection_reasons",
        }
    }

    /// Column carrying the display value.
    pub fn display_field(&self) -> &'static str {
        match self {
            ReferenceTable::AdCode => "code",
            _ => "name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceTable::LeadSource => "Lead source",
            ReferenceTable::AdCode => "Ad code",
            ReferenceTable::Service => "Service",
            ReferenceTable::RejectionReason => "Rejection reason",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ReferenceItem {
    pub id: Uuid,
    #[schema(example = "Meta Ads")]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferenceRequest {
    #[schema(example = "Google Ads")]
    pub display_name: String,
}

/// Label for a fixed enumeration value (facility type, status).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct EnumOption {
    pub value: String,
    pub label: String,
}

/// Small lookup lists held next to the prospect records.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ReferenceData {
    pub lead_sources: Vec<ReferenceItem>,
    pub ad_codes: Vec<ReferenceItem>,
    pub services: Vec<ReferenceItem>,
    pub rejection_reasons: Vec<ReferenceItem>,
    pub users: Vec<UserProfile>,
}

impl ReferenceData {
    pub fn items(&self, table: ReferenceTable) -> &[ReferenceItem] {
        match table {
            ReferenceTable::LeadSource => &self.lead_sources,
            ReferenceTable::AdCode => &self.ad_codes,
            ReferenceTable::Service => &self.services,
            ReferenceTable::RejectionReason => &self.rejection_reasons,
        }
    }

    pub fn find(&self, table: ReferenceTable, id: uuid::Uuid) -> Option<&ReferenceItem> {
        self.items(table).iter().find(|item| item.id == id)
    }

    pub fn user(&self, id: uuid::Uuid) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for table in ReferenceTable::ALL {
            assert_eq!(ReferenceTable::from_slug(table.slug()), Some(table));
        }
        assert_eq!(ReferenceTable::from_slug("statuses"), None);
    }

    #[test]
    fn test_display_field() {
        assert_eq!(ReferenceTable::AdCode.display_field(), "code");
        assert_eq!(ReferenceTable::LeadSource.display_field(), "name");
    }
}
