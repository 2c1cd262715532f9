use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ProspectRecord;

/// Rates at or above this are shown as a strong conversion.
pub const HIGH_BAND_MIN: f64 = 50.0;
/// Rates at or above this (and below [`HIGH_BAND_MIN`]) are shown as average.
pub const MEDIUM_BAND_MIN: f64 = 25.0;

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Prospect-to-lead conversion in percent, one decimal. Zero prospects yield 0.
pub fn conversion_rate(leads: u64, prospects: u64) -> f64 {
    if prospects == 0 {
        return 0.0;
    }
    round1(leads as f64 / prospects as f64 * 100.0)
}

/// Colour band the dashboard paints a conversion rate with.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConversionBand {
    High,
    Medium,
    Low,
}

impl ConversionBand {
    pub fn for_rate(ctr: f64) -> Self {
        if ctr >= HIGH_BAND_MIN {
            ConversionBand::High
        } else if ctr >= MEDIUM_BAND_MIN {
            ConversionBand::Medium
        } else {
            ConversionBand::Low
        }
    }
}

/// Running prospect/lead counts for one group.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub prospects: u64,
    pub leads: u64,
}

impl Tally {
    pub fn add(&mut self, record: &ProspectRecord) {
        self.prospects += 1;
        if record.is_lead() {
            self.leads += 1;
        }
    }

    pub fn merge(&mut self, other: Tally) {
        self.prospects += other.prospects;
        self.leads += other.leads;
    }

    pub fn ctr(&self) -> f64 {
        conversion_rate(self.leads, self.prospects)
    }

    pub fn of(records: &[&ProspectRecord]) -> Self {
        let mut tally = Tally::default();
        for record in records {
            tally.add(record);
        }
        tally
    }
}

/// One rendered row of a breakdown table, optionally carrying nested sub-rows.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct ReportRow {
    #[schema(example = "Meta Ads")]
    pub name: String,
    pub prospect_count: u64,
    pub lead_count: u64,
    /// Conversion rate in percent, one decimal
    #[schema(example = 50.0)]
    pub ctr: f64,
    pub band: ConversionBand,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<ReportRow>,
}

impl ReportRow {
    pub fn new(name: impl Into<String>, tally: Tally) -> Self {
        let ctr = tally.ctr();
        Self {
            name: name.into(),
            prospect_count: tally.prospects,
            lead_count: tally.leads,
            ctr,
            band: ConversionBand::for_rate(ctr),
            breakdown: Vec::new(),
        }
    }

    pub fn with_breakdown(mut self, breakdown: Vec<ReportRow>) -> Self {
        self.breakdown = breakdown;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_rate_rounding() {
        assert_eq!(conversion_rate(1, 3), 33.3);
        assert_eq!(conversion_rate(2, 3), 66.7);
        assert_eq!(conversion_rate(1, 2), 50.0);
        assert_eq!(conversion_rate(5, 5), 100.0);
    }

    #[test]
    fn test_conversion_rate_zero_prospects() {
        let rate = conversion_rate(0, 0);
        assert_eq!(rate, 0.0);
        assert!(rate.is_finite());
    }

    #[test]
    fn test_bands() {
        assert_eq!(ConversionBand::for_rate(100.0), ConversionBand::High);
        assert_eq!(ConversionBand::for_rate(50.0), ConversionBand::High);
        assert_eq!(ConversionBand::for_rate(49.9), ConversionBand::Medium);
        assert_eq!(ConversionBand::for_rate(25.0), ConversionBand::Medium);
        assert_eq!(ConversionBand::for_rate(0.0), ConversionBand::Low);
    }

    #[test]
    fn test_row_from_empty_tally() {
        let row = ReportRow::new("Empty", Tally::default());
        assert_eq!(row.ctr, 0.0);
        assert_eq!(row.band, ConversionBand::Low);
        assert!(row.breakdown.is_empty());
    }
}
