use crate::models::{ProspectRecord, ReferenceItem};
use crate::reports::{
    ORGANIC_LABEL, ReportRow, Tally, aggregate_by, is_paid_channel, order_by_reference,
};

/// Bucket for ad-code records that carry no ad id.
pub const NO_AD_ID_LABEL: &str = "no id";

/// Breakdown by lead source with the organic roll-up.
///
/// Paid sources stay top-level rows in source-table order. Every other source
/// is folded into a single trailing "Organic" row whose sub-rows list the
/// contributing sources.
pub fn by_source(records: &[&ProspectRecord], sources: &[ReferenceItem]) -> Vec<ReportRow> {
    let groups = order_by_reference(
        aggregate_by(records, |r| Some(r.lead_source.clone())),
        sources,
    );

    let mut rows = Vec::new();
    let mut organic = Tally::default();
    let mut organic_rows = Vec::new();
    for (name, tally) in groups {
        if is_paid_channel(&name) {
            rows.push(ReportRow::new(name, tally));
        } else {
            organic.merge(tally);
            organic_rows.push(ReportRow::new(name, tally));
        }
    }

    if organic.prospects > 0 {
        rows.push(ReportRow::new(ORGANIC_LABEL, organic).with_breakdown(organic_rows));
    }
    rows
}

fn ad_id_key(record: &ProspectRecord) -> String {
    match record.ad_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => NO_AD_ID_LABEL.to_string(),
    }
}

/// Breakdown by ad code, in ad-code-table order, with a per-ad-id sub-breakdown
/// attached only when a code spans more than one distinct ad id.
///
/// Records without an ad code are not part of this dimension.
pub fn by_ad_code(records: &[&ProspectRecord], ad_codes: &[ReferenceItem]) -> Vec<ReportRow> {
    let groups = order_by_reference(aggregate_by(records, |r| r.ad_code.clone()), ad_codes);

    groups
        .into_iter()
        .map(|(code, tally)| {
            let members: Vec<&ProspectRecord> = records
                .iter()
                .copied()
                .filter(|r| r.ad_code.as_deref() == Some(code.as_str()))
                .collect();
            let by_id = aggregate_by(&members, |r| Some(ad_id_key(r)));
            let row = ReportRow::new(code, tally);
            if by_id.len() > 1 {
                row.with_breakdown(
                    by_id
                        .into_iter()
                        .map(|(id, t)| ReportRow::new(id, t))
                        .collect(),
                )
            } else {
                row
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProspectStatus::*;
    use crate::reports::fixtures::*;

    #[test]
    fn test_source_scenario_with_organic_rollup() {
        let records = vec![
            record("Meta Ads", Lead),
            record("Meta Ads", Prospect),
            record("Referral", Lead),
        ];
        let sources = items(&["Meta Ads", "Referral"]);

        let out = by_source(&refs(&records), &sources);
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].name, "Meta Ads");
        assert_eq!(out[0].prospect_count, 2);
        assert_eq!(out[0].lead_count, 1);
        assert_eq!(out[0].ctr, 50.0);
        assert!(out[0].breakdown.is_empty());

        assert_eq!(out[1].name, ORGANIC_LABEL);
        assert_eq!(out[1].prospect_count, 1);
        assert_eq!(out[1].lead_count, 1);
        assert_eq!(out[1].ctr, 100.0);
        assert_eq!(out[1].breakdown.len(), 1);
        assert_eq!(out[1].breakdown[0].name, "Referral");
        assert_eq!(out[1].breakdown[0].prospect_count, 1);
        assert_eq!(out[1].breakdown[0].ctr, 100.0);
    }

    #[test]
    fn test_organic_sub_rows_sum_to_parent() {
        let records = vec![
            record("Referral", Lead),
            record("Website", Prospect),
            record("Website", Lead),
            record("Google ADS", Prospect),
            record("Event", NotALead),
        ];
        let sources = items(&["Google ADS", "Website", "Referral", "Event"]);

        let out = by_source(&refs(&records), &sources);
        let top: Vec<_> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(top, vec!["Google ADS", ORGANIC_LABEL]);

        let organic = &out[1];
        let sum: u64 = organic.breakdown.iter().map(|r| r.prospect_count).sum();
        assert_eq!(sum, organic.prospect_count);
        let subs: Vec<_> = organic.breakdown.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(subs, vec!["Website", "Referral", "Event"]);
        assert_eq!(organic.ctr, 50.0);
    }

    #[test]
    fn test_no_organic_row_when_only_paid() {
        let records = vec![record("Meta Ads", Lead)];
        let out = by_source(&refs(&records), &items(&["Meta Ads", "Referral"]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Meta Ads");
    }

    #[test]
    fn test_single_ad_id_stays_flat() {
        let records = vec![
            with_ad(record("Meta Ads", Lead), "MA-01", Some("123")),
            with_ad(record("Meta Ads", Prospect), "MA-01", Some("123")),
        ];
        let out = by_ad_code(&refs(&records), &items(&["MA-01"]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].prospect_count, 2);
        assert!(out[0].breakdown.is_empty());
    }

    #[test]
    fn test_multiple_ad_ids_expand() {
        let records = vec![
            with_ad(record("Meta Ads", Lead), "MA-01", Some("123")),
            with_ad(record("Meta Ads", Prospect), "MA-01", Some("456")),
            with_ad(record("Meta Ads", Lead), "MA-01", None),
            with_ad(record("Meta Ads", Lead), "MA-01", Some("  ")),
            with_ad(record("Google Ads", Prospect), "GA-07", Some("9")),
            record("Referral", Lead),
        ];
        let out = by_ad_code(&refs(&records), &items(&["GA-07", "MA-01"]));
        let codes: Vec<_> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(codes, vec!["GA-07", "MA-01"]);

        let ma = &out[1];
        assert_eq!(ma.prospect_count, 4);
        assert_eq!(ma.ctr, 75.0);
        let ids: Vec<_> = ma.breakdown.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(ids, vec!["123", "456", NO_AD_ID_LABEL]);
        assert_eq!(ma.breakdown[2].prospect_count, 2);
        assert_eq!(ma.breakdown[2].ctr, 100.0);
        assert_eq!(ma.breakdown[1].ctr, 0.0);
    }
}
