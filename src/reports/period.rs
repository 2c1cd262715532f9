use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ProspectRecord;

/// Calendar window a report is narrowed to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    All,
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    Custom,
}

/// Which timestamp of a record the period filter looks at.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateBasis {
    #[default]
    EntryDate,
    CreatedAt,
}

impl std::str::FromStr for DateBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry_date" => Ok(DateBasis::EntryDate),
            "created_at" => Ok(DateBasis::CreatedAt),
            other => Err(format!("unknown date basis: {other}")),
        }
    }
}

/// Inclusive custom range. Either bound missing means "no filtering".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// The viewer's notion of "now": an instant plus the timezone calendar fields are read in.
#[derive(Debug, Clone, Copy)]
pub struct ReportClock {
    pub tz: Tz,
    pub now: DateTime<Utc>,
}

impl ReportClock {
    pub fn new(tz: Tz, now: DateTime<Utc>) -> Self {
        Self { tz, now }
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.tz).date_naive()
    }
}

impl DateBasis {
    pub fn timestamp(&self, record: &ProspectRecord) -> DateTime<Utc> {
        match self {
            DateBasis::EntryDate => record.entry_date,
            DateBasis::CreatedAt => record.created_at,
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_first.map(|d| d - Duration::days(1)).unwrap_or(date)
}

/// Resolve a period to an inclusive local-date window. `None` means unfiltered.
pub fn period_window(period: Period, range: DateRange, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    // Weeks start on Sunday
    let start_of_week = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    match period {
        Period::All => None,
        Period::Today => Some((today, today)),
        Period::Yesterday => {
            let yesterday = today - Duration::days(1);
            Some((yesterday, yesterday))
        }
        Period::ThisWeek => Some((start_of_week, today)),
        Period::LastWeek => Some((
            start_of_week - Duration::days(7),
            start_of_week - Duration::days(1),
        )),
        Period::ThisMonth => Some((first_of_month(today), last_of_month(today))),
        Period::LastMonth => {
            let last_month = first_of_month(today) - Duration::days(1);
            Some((first_of_month(last_month), last_month))
        }
        Period::Custom => match (range.from, range.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        },
    }
}

/// Keep the records whose local calendar date falls inside the period.
pub fn filter_by_period<'a, I>(
    records: I,
    period: Period,
    range: DateRange,
    basis: DateBasis,
    clock: &ReportClock,
) -> Vec<&'a ProspectRecord>
where
    I: IntoIterator<Item = &'a ProspectRecord>,
{
    match period_window(period, range, clock.today()) {
        None => records.into_iter().collect(),
        Some((start, end)) => records
            .into_iter()
            .filter(|r| {
                let date = clock.local_date(basis.timestamp(r));
                date >= start && date <= end
            })
            .collect(),
    }
}
