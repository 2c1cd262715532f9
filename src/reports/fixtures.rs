//! Record builders shared by the report tests.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Asia::Jakarta;
use uuid::Uuid;

use crate::entities::{FacilityType, ProspectStatus, UserRole};
use crate::models::{CurrentUser, ProspectRecord, ReferenceItem, UserRef};

pub fn jakarta(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Jakarta
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid local time")
        .with_timezone(&Utc)
}

pub fn user(name: &str) -> UserRef {
    UserRef {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
    }
}

pub fn current(user: &UserRef, role: UserRole) -> CurrentUser {
    CurrentUser {
        id: user.id,
        full_name: user.full_name.clone(),
        role,
    }
}

pub fn items(names: &[&str]) -> Vec<ReferenceItem> {
    names
        .iter()
        .map(|n| ReferenceItem {
            id: Uuid::new_v4(),
            display_name: n.to_string(),
        })
        .collect()
}

pub fn record(source: &str, status: ProspectStatus) -> ProspectRecord {
    let at = jakarta(2026, 10, 14, 9, 30);
    ProspectRecord {
        id: Uuid::new_v4(),
        entry_date: at,
        created_at: at,
        updated_at: at,
        prospect_name: "Prospect".to_string(),
        whatsapp_number: "6281234567890".to_string(),
        facility_name: "Klinik Sehat".to_string(),
        facility_type: FacilityType::Clinic,
        province: "JAWA BARAT".to_string(),
        city: "KOTA BANDUNG".to_string(),
        status,
        lead_source_id: Uuid::new_v4(),
        lead_source: source.to_string(),
        ad_code_id: None,
        ad_code: None,
        ad_id: None,
        service_id: Uuid::new_v4(),
        service: "SIMRS".to_string(),
        rejection_reason_id: None,
        rejection_reason: None,
        rejection_note: None,
        assigned_to: None,
        created_by: None,
    }
}

pub fn at(mut r: ProspectRecord, when: DateTime<Utc>) -> ProspectRecord {
    r.entry_date = when;
    r.created_at = when;
    r
}

pub fn with_ad(mut r: ProspectRecord, code: &str, ad_id: Option<&str>) -> ProspectRecord {
    r.ad_code_id = Some(Uuid::new_v4());
    r.ad_code = Some(code.to_string());
    r.ad_id = ad_id.map(str::to_string);
    r
}

pub fn refs(records: &[ProspectRecord]) -> Vec<&ProspectRecord> {
    records.iter().collect()
}
