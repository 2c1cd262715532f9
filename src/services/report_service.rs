use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::ReportConfig;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::reports::*;
use crate::services::require_admin;
use crate::store::RecordStore;

/// Viewer-side settings every report and the prospect list run with.
#[derive(Debug, Clone, Copy)]
pub struct ReportSettings {
    pub tz: Tz,
    pub scope_match: ScopeMatch,
    pub date_basis: DateBasis,
}

impl ReportSettings {
    pub fn from_config(config: &ReportConfig) -> AppResult<Self> {
        Ok(Self {
            tz: config.tz().map_err(AppError::ConfigError)?,
            scope_match: config.scope_match,
            date_basis: config.period_date_basis,
        })
    }

    /// Scope to the caller, then narrow to the requested period.
    pub fn select<'a>(
        &self,
        records: &'a [ProspectRecord],
        user: &CurrentUser,
        query: &ReportQuery,
        now: DateTime<Utc>,
    ) -> Vec<&'a ProspectRecord> {
        let scoped = scope(records, user, self.scope_match);
        filter_by_period(
            scoped,
            query.period.unwrap_or_default(),
            query.range(),
            query.date_basis.unwrap_or(self.date_basis),
            &ReportClock::new(self.tz, now),
        )
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            tz: chrono_tz::Asia::Jakarta,
            scope_match: ScopeMatch::default(),
            date_basis: DateBasis::default(),
        }
    }
}

#[derive(Clone)]
pub struct ReportService {
    store: RecordStore,
    settings: ReportSettings,
}

fn response(query: &ReportQuery, records: &[&ProspectRecord], rows: Vec<ReportRow>) -> ReportResponse {
    ReportResponse {
        period: query.period.unwrap_or_default(),
        total_prospects: records.len() as u64,
        rows,
    }
}

impl ReportService {
    pub fn new(store: RecordStore, settings: ReportSettings) -> Self {
        Self { store, settings }
    }

    pub async fn overview(&self, user: &CurrentUser, query: &ReportQuery) -> AppResult<Overview> {
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        Ok(overview(&records))
    }

    pub async fn sources(&self, user: &CurrentUser, query: &ReportQuery) -> AppResult<ReportResponse> {
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        let rows = by_source(&records, &snapshot.reference.lead_sources);
        Ok(response(query, &records, rows))
    }

    pub async fn ad_codes(&self, user: &CurrentUser, query: &ReportQuery) -> AppResult<ReportResponse> {
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        let rows = by_ad_code(&records, &snapshot.reference.ad_codes);
        Ok(response(query, &records, rows))
    }

    pub async fn services(&self, user: &CurrentUser, query: &ReportQuery) -> AppResult<ReportResponse> {
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        let rows = by_service(&records, &snapshot.reference.services);
        Ok(response(query, &records, rows))
    }

    pub async fn cities(&self, user: &CurrentUser, query: &ReportQuery) -> AppResult<ReportResponse> {
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        let rows = by_city(&records);
        Ok(response(query, &records, rows))
    }

    pub async fn cs_performance(
        &self,
        user: &CurrentUser,
        query: &ReportQuery,
    ) -> AppResult<ReportResponse> {
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        let rows = by_assignee(&records);
        Ok(response(query, &records, rows))
    }

    pub async fn day_activity(
        &self,
        user: &CurrentUser,
        query: &ReportQuery,
    ) -> AppResult<ReportResponse> {
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        let rows = day_activity(&records, self.settings.tz);
        Ok(response(query, &records, rows))
    }

    /// Weekday by hour grid. Admin only.
    pub async fn heatmap(&self, user: &CurrentUser, query: &ReportQuery) -> AppResult<HeatmapResponse> {
        require_admin(user)?;
        let snapshot = self.store.snapshot().await;
        let records = self.settings.select(&snapshot.records, user, query, Utc::now());
        Ok(HeatmapResponse {
            period: query.period.unwrap_or_default(),
            total_prospects: records.len() as u64,
            heatmap: build_heatmap(&records, self.settings.tz),
        })
    }

    /// Force a store reload. Admin only.
    pub async fn refresh(&self, user: &CurrentUser) -> AppResult<RefreshResponse> {
        require_admin(user)?;
        let snapshot = self.store.refresh().await?;
        Ok(RefreshResponse {
            version: snapshot.version,
            record_count: snapshot.records.len(),
        })
    }
}
