//! In-memory record store.
//!
//! The store is the single owner of the prospect list and the reference tables.
//! Readers take a cheap [`Arc<Snapshot>`]; writers persist through the services
//! and then call [`RecordStore::refresh`], which re-reads everything and swaps
//! the snapshot in one step. Subscribers are told about new versions through a
//! `watch` channel.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::entities::{
    ad_code_entity as ad_codes, lead_source_entity as lead_sources, profile_entity as profiles,
    prospect_entity as prospects, rejection_reason_entity as rejection_reasons,
    service_entity as services,
};
use crate::error::AppResult;
use crate::models::{ProspectRecord, ReferenceData, ReferenceItem, UserProfile, UserRef};

/// Display name used when a prospect points at a reference row that no longer exists.
pub const MISSING_REFERENCE_LABEL: &str = "(deleted)";

#[derive(Debug, Default)]
pub struct Snapshot {
    pub records: Vec<ProspectRecord>,
    pub reference: ReferenceData,
    /// Starts at 0 (nothing loaded) and grows by one per successful refresh.
    pub version: u64,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn record(&self, id: Uuid) -> Option<&ProspectRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

#[derive(Clone)]
pub struct RecordStore {
    pool: DatabaseConnection,
    current: Arc<RwLock<Arc<Snapshot>>>,
    version_tx: Arc<watch::Sender<u64>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        Self {
            pool,
            current: Arc::new(RwLock::new(Arc::new(Snapshot::default()))),
            version_tx: Arc::new(version_tx),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current snapshot. Never blocks on a refresh in progress for longer than the swap.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Receive the version number of every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    /// Re-fetch all tables and publish a new snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is returned.
    pub async fn refresh(&self) -> AppResult<Arc<Snapshot>> {
        let _guard = self.refresh_lock.lock().await;

        let (records, reference) = match load(&self.pool).await {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("Record store refresh failed, keeping previous snapshot: {e}");
                return Err(e);
            }
        };

        let snapshot = {
            let mut current = self.current.write().await;
            let next = Arc::new(Snapshot {
                records,
                reference,
                version: current.version + 1,
                loaded_at: Some(Utc::now()),
            });
            *current = next.clone();
            next
        };

        self.version_tx.send_replace(snapshot.version);
        log::info!(
            "Record store refreshed: version {}, {} prospects",
            snapshot.version,
            snapshot.records.len()
        );
        Ok(snapshot)
    }
}

fn reference_items<T>(rows: Vec<T>, f: impl Fn(T) -> ReferenceItem) -> Vec<ReferenceItem> {
    rows.into_iter().map(f).collect()
}

fn names(items: &[ReferenceItem]) -> HashMap<Uuid, &str> {
    items
        .iter()
        .map(|i| (i.id, i.display_name.as_str()))
        .collect()
}

async fn load(pool: &DatabaseConnection) -> AppResult<(Vec<ProspectRecord>, ReferenceData)> {
    let lead_sources = lead_sources::Entity::find()
        .order_by_asc(lead_sources::Column::CreatedAt)
        .order_by_asc(lead_sources::Column::Name)
        .all(pool)
        .await?;
    let ad_codes = ad_codes::Entity::find()
        .order_by_asc(ad_codes::Column::CreatedAt)
        .order_by_asc(ad_codes::Column::Code)
        .all(pool)
        .await?;
    let services = services::Entity::find()
        .order_by_asc(services::Column::CreatedAt)
        .order_by_asc(services::Column::Name)
        .all(pool)
        .await?;
    let rejection_reasons = rejection_reasons::Entity::find()
        .order_by_asc(rejection_reasons::Column::CreatedAt)
        .order_by_asc(rejection_reasons::Column::Name)
        .all(pool)
        .await?;
    let users = profiles::Entity::find()
        .order_by_asc(profiles::Column::FullName)
        .all(pool)
        .await?;
    let rows = prospects::Entity::find()
        .order_by_desc(prospects::Column::EntryDate)
        .all(pool)
        .await?;

    let reference = ReferenceData {
        lead_sources: reference_items(lead_sources, |m| ReferenceItem {
            id: m.id,
            display_name: m.name,
        }),
        ad_codes: reference_items(ad_codes, |m| ReferenceItem {
            id: m.id,
            display_name: m.code,
        }),
        services: reference_items(services, |m| ReferenceItem {
            id: m.id,
            display_name: m.name,
        }),
        rejection_reasons: reference_items(rejection_reasons, |m| ReferenceItem {
            id: m.id,
            display_name: m.name,
        }),
        users: users.into_iter().map(UserProfile::from).collect(),
    };

    let records = denormalize(rows, &reference);
    Ok((records, reference))
}

/// Join reference names and user names into flat records.
pub fn denormalize(rows: Vec<prospects::Model>, reference: &ReferenceData) -> Vec<ProspectRecord> {
    let source_names = names(&reference.lead_sources);
    let ad_code_names = names(&reference.ad_codes);
    let service_names = names(&reference.services);
    let reason_names = names(&reference.rejection_reasons);
    let user_names: HashMap<Uuid, &str> = reference
        .users
        .iter()
        .map(|u| (u.id, u.full_name.as_str()))
        .collect();

    let label = |map: &HashMap<Uuid, &str>, id: Uuid| {
        map.get(&id)
            .copied()
            .unwrap_or(MISSING_REFERENCE_LABEL)
            .to_string()
    };
    let user_ref = |id: Option<Uuid>| {
        id.map(|id| UserRef {
            id,
            full_name: label(&user_names, id),
        })
    };

    rows.into_iter()
        .map(|m| ProspectRecord {
            id: m.id,
            entry_date: m.entry_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
            prospect_name: m.prospect_name,
            whatsapp_number: m.whatsapp_number,
            facility_name: m.facility_name,
            facility_type: m.facility_type,
            province: m.province,
            city: m.city,
            status: m.status,
            lead_source: label(&source_names, m.lead_source_id),
            lead_source_id: m.lead_source_id,
            ad_code: m.ad_code_id.map(|id| label(&ad_code_names, id)),
            ad_code_id: m.ad_code_id,
            ad_id: m.ad_id,
            service: label(&service_names, m.service_id),
            service_id: m.service_id,
            rejection_reason: m.rejection_reason_id.map(|id| label(&reason_names, id)),
            rejection_reason_id: m.rejection_reason_id,
            rejection_note: m.rejection_note,
            assigned_to: user_ref(m.assigned_to),
            created_by: user_ref(m.created_by),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{FacilityType, ProspectStatus};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_empty_store_starts_at_version_zero() {
        let db = setup_test_db().await.unwrap();
        let store = RecordStore::new(db);
        let snap = store.snapshot().await;
        assert_eq!(snap.version, 0);
        assert!(snap.records.is_empty());
        assert!(snap.loaded_at.is_none());
    }

    #[tokio::test]
    async fn test_refresh_denormalizes_and_notifies() {
        let db = setup_test_db().await.unwrap();
        let admin = create_test_profile(&db, "Admin", crate::entities::UserRole::Admin)
            .await
            .unwrap();
        let source = create_test_reference(&db, crate::models::ReferenceTable::LeadSource, "Meta Ads")
            .await
            .unwrap();
        let service = create_test_reference(&db, crate::models::ReferenceTable::Service, "SIMRS")
            .await
            .unwrap();
        insert_test_prospect(&db, source, service, ProspectStatus::Lead, Some(admin.id))
            .await
            .unwrap();

        let store = RecordStore::new(db);
        let mut rx = store.subscribe();
        let snap = store.refresh().await.unwrap();

        assert_eq!(snap.version, 1);
        assert_eq!(*rx.borrow_and_update(), 1);
        assert_eq!(snap.records.len(), 1);
        let record = &snap.records[0];
        assert_eq!(record.lead_source, "Meta Ads");
        assert_eq!(record.service, "SIMRS");
        assert_eq!(record.facility_type, FacilityType::Clinic);
        assert_eq!(record.assigned_to.as_ref().unwrap().full_name, "Admin");
        assert_eq!(snap.reference.lead_sources.len(), 1);
        assert_eq!(snap.reference.users.len(), 1);

        let again = store.refresh().await.unwrap();
        assert_eq!(again.version, 2);
    }

    #[test]
    fn test_denormalize_missing_reference() {
        let reference = ReferenceData::default();
        let now = Utc::now();
        let row = prospects::Model {
            id: Uuid::new_v4(),
            entry_date: now,
            prospect_name: "P".to_string(),
            whatsapp_number: "6281234567890".to_string(),
            facility_name: "F".to_string(),
            facility_type: FacilityType::Hospital,
            province: "BALI".to_string(),
            city: "KOTA DENPASAR".to_string(),
            lead_source_id: Uuid::new_v4(),
            ad_code_id: None,
            ad_id: None,
            service_id: Uuid::new_v4(),
            status: ProspectStatus::Prospect,
            rejection_reason_id: None,
            rejection_note: None,
            assigned_to: None,
            created_by: Some(Uuid::new_v4()),
            created_at: now,
            updated_at: now,
        };
        let records = denormalize(vec![row], &reference);
        assert_eq!(records[0].lead_source, MISSING_REFERENCE_LABEL);
        assert!(records[0].ad_code.is_none());
        assert_eq!(
            records[0].created_by.as_ref().unwrap().full_name,
            MISSING_REFERENCE_LABEL
        );
    }
}
