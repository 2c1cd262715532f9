use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::ProspectStatus;
use crate::models::{ProspectRecord, ReferenceItem};
use crate::reports::{ConversionBand, ReportRow, Tally};

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Label used for records without any PIC.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Group records by `key`, keeping groups in the order their key first appears.
///
/// Records for which `key` returns `None` do not belong to the dimension and
/// are left out.
pub fn aggregate_by<K, F>(records: &[&ProspectRecord], key: F) -> Vec<(K, Tally)>
where
    K: Eq + Hash + Clone,
    F: Fn(&ProspectRecord) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Tally)> = Vec::new();
    for &record in records {
        let Some(k) = key(record) else {
            continue;
        };
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Tally::default()));
            groups.len() - 1
        });
        groups[slot].1.add(record);
    }
    groups
}

/// Reorder name-keyed groups to follow a reference table.
///
/// Groups whose name is not in the table (renamed or deleted rows) follow in
/// discovery order. Empty groups never appear since they were never discovered.
pub fn order_by_reference(
    groups: Vec<(String, Tally)>,
    reference: &[ReferenceItem],
) -> Vec<(String, Tally)> {
    let mut remaining: Vec<Option<(String, Tally)>> = groups.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    for item in reference {
        if let Some(slot) = remaining
            .iter_mut()
            .find(|g| g.as_ref().is_some_and(|(name, _)| *name == item.display_name))
        {
            ordered.extend(slot.take());
        }
    }
    ordered.extend(remaining.into_iter().flatten());
    ordered
}

fn rows(groups: Vec<(String, Tally)>) -> Vec<ReportRow> {
    groups
        .into_iter()
        .map(|(name, tally)| ReportRow::new(name, tally))
        .collect()
}

/// Breakdown by service, in service-table order.
pub fn by_service(records: &[&ProspectRecord], services: &[ReferenceItem]) -> Vec<ReportRow> {
    let groups = aggregate_by(records, |r| Some(r.service.clone()));
    rows(order_by_reference(groups, services))
}

/// Breakdown by city, in discovery order. Blank cities are skipped.
pub fn by_city(records: &[&ProspectRecord]) -> Vec<ReportRow> {
    let groups = aggregate_by(records, |r| {
        let city = r.city.trim();
        (!city.is_empty()).then(|| city.to_string())
    });
    rows(groups)
}

/// CS performance: breakdown by PIC display name, in discovery order.
pub fn by_assignee(records: &[&ProspectRecord]) -> Vec<ReportRow> {
    let groups = aggregate_by(records, |r| {
        Some(
            r.pic()
                .map(|p| p.full_name.clone())
                .unwrap_or_else(|| UNASSIGNED_LABEL.to_string()),
        )
    });
    rows(groups)
}

/// Weekday (0 = Sunday) of a timestamp in the viewer's timezone.
pub fn local_weekday(at: DateTime<Utc>, tz: Tz) -> usize {
    at.with_timezone(&tz).weekday().num_days_from_sunday() as usize
}

/// Activity per weekday, always seven rows from Sunday, empty days included.
pub fn day_activity(records: &[&ProspectRecord], tz: Tz) -> Vec<ReportRow> {
    let mut days = [Tally::default(); 7];
    for &record in records {
        days[local_weekday(record.entry_date, tz)].add(record);
    }
    WEEKDAY_NAMES
        .iter()
        .zip(days)
        .map(|(name, tally)| ReportRow::new(*name, tally))
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct StatusCount {
    pub status: ProspectStatus,
    pub label: String,
    pub count: u64,
}

/// Pipeline summary for the dashboard header.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct Overview {
    pub total_prospects: u64,
    pub lead_count: u64,
    pub ctr: f64,
    pub band: ConversionBand,
    pub by_status: Vec<StatusCount>,
}

pub fn overview(records: &[&ProspectRecord]) -> Overview {
    let tally = Tally::of(records);
    let ctr = tally.ctr();
    let by_status = ProspectStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            label: status.label().to_string(),
            count: records.iter().filter(|r| r.status == *status).count() as u64,
        })
        .collect();
    Overview {
        total_prospects: tally.prospects,
        lead_count: tally.leads,
        ctr,
        band: ConversionBand::for_rate(ctr),
        by_status,
    }
}
