/// Name of the synthetic group every non-paid lead source is rolled into.
pub const ORGANIC_LABEL: &str = "Organic";

/// Marker that identifies a paid advertising channel in a lead source name.
const PAID_CHANNEL_MARKER: &str = "ads";

/// Whether a lead source name denotes a paid channel ("Meta Ads", "Google ads", ...).
///
/// This single check drives both the organic roll-up in the source report and
/// the ad-code requirement on the prospect form.
pub fn is_paid_channel(lead_source: &str) -> bool {
    lead_source.to_lowercase().contains(PAID_CHANNEL_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_paid_channel() {
        assert!(is_paid_channel("Meta Ads"));
        assert!(is_paid_channel("GOOGLE ADS"));
        assert!(is_paid_channel("tiktok-ads"));
        assert!(!is_paid_channel("Referral"));
        assert!(!is_paid_channel("Website"));
        assert!(!is_paid_channel(""));
    }
}
