use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::reports::{DateBasis, DateRange, Heatmap, Period, ReportRow};

/// Filters shared by every report endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    pub period: Option<Period>,
    /// Custom range start (YYYY-MM-DD, inclusive)
    pub from: Option<NaiveDate>,
    /// Custom range end (YYYY-MM-DD, inclusive)
    pub to: Option<NaiveDate>,
    pub date_basis: Option<DateBasis>,
}

impl ReportQuery {
    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportResponse {
    pub period: Period,
    pub total_prospects: u64,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeatmapResponse {
    pub period: Period,
    pub total_prospects: u64,
    pub heatmap: Heatmap,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub version: u64,
    pub record_count: usize,
}
