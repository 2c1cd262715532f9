use chrono::Timelike;
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ProspectRecord;
use crate::reports::{WEEKDAY_NAMES, local_weekday};

pub const HOURS_PER_DAY: usize = 24;
pub const HEATMAP_CELLS: usize = 7 * HOURS_PER_DAY;

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct HeatmapCell {
    /// 0 = Sunday
    pub day_of_week: u8,
    pub day_name: String,
    pub hour_of_day: u8,
    pub prospect_count: u64,
    pub lead_count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct Heatmap {
    /// Day-major: Sunday 00h, Sunday 01h, ..., Saturday 23h
    pub cells: Vec<HeatmapCell>,
    pub max_prospect_count: u64,
}

/// Bin records by local weekday and hour of their entry timestamp.
///
/// The grid is dense: all 168 cells are present even when empty.
pub fn build_heatmap(records: &[&ProspectRecord], tz: Tz) -> Heatmap {
    let mut cells: Vec<HeatmapCell> = (0..HEATMAP_CELLS)
        .map(|i| HeatmapCell {
            day_of_week: (i / HOURS_PER_DAY) as u8,
            day_name: WEEKDAY_NAMES[i / HOURS_PER_DAY].to_string(),
            hour_of_day: (i % HOURS_PER_DAY) as u8,
            prospect_count: 0,
            lead_count: 0,
        })
        .collect();

    for record in records {
        let day = local_weekday(record.entry_date, tz);
        let hour = record.entry_date.with_timezone(&tz).hour() as usize;
        let cell = &mut cells[day * HOURS_PER_DAY + hour];
        cell.prospect_count += 1;
        if record.is_lead() {
            cell.lead_count += 1;
        }
    }

    let max_prospect_count = cells.iter().map(|c| c.prospect_count).max().unwrap_or(0);
    Heatmap {
        cells,
        max_prospect_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProspectStatus::*;
    use crate::reports::fixtures::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_input_yields_full_grid() {
        let map = build_heatmap(&[], chrono_tz::Asia::Jakarta);
        assert_eq!(map.cells.len(), HEATMAP_CELLS);
        assert!(map.cells.iter().all(|c| c.prospect_count == 0 && c.lead_count == 0));
        assert_eq!(map.max_prospect_count, 0);
        assert_eq!(map.cells[0].day_name, "Sunday");
        assert_eq!(map.cells[167].day_of_week, 6);
        assert_eq!(map.cells[167].hour_of_day, 23);
    }

    #[test]
    fn test_binning_uses_local_time() {
        let tz = chrono_tz::Asia::Jakarta;
        // Friday 2026-10-16 09:15 WIB, twice; Saturday 00:30 WIB is still Friday in UTC
        let saturday_early = chrono::Utc.with_ymd_and_hms(2026, 10, 16, 17, 30, 0).unwrap();
        let records = vec![
            at(record("A", Lead), jakarta(2026, 10, 16, 9, 15)),
            at(record("A", Prospect), jakarta(2026, 10, 16, 9, 45)),
            at(record("A", Lead), saturday_early),
        ];
        let map = build_heatmap(&refs(&records), tz);
        assert_eq!(map.cells.len(), HEATMAP_CELLS);

        let friday_nine = &map.cells[5 * 24 + 9];
        assert_eq!(friday_nine.prospect_count, 2);
        assert_eq!(friday_nine.lead_count, 1);

        let saturday_midnight = &map.cells[6 * 24];
        assert_eq!(saturday_midnight.prospect_count, 1);
        assert_eq!(map.max_prospect_count, 2);

        let total: u64 = map.cells.iter().map(|c| c.prospect_count).sum();
        assert_eq!(total, 3);
    }
}
