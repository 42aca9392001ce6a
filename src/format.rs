/// Display formatting helpers
use chrono::{DateTime, Utc};

/// Date in the style "Fri, 5 February 2021"
pub fn date_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %-d %B %Y").to_string()
}

/// Human-readable label for a filter value.
///
/// Values containing `-` or `_` get a label with those replaced by spaces;
/// anything else is shown as-is and needs no label.
pub fn option_label(value: &str) -> Option<String> {
    if value.contains(['-', '_']) {
        Some(value.replace(['-', '_'], " "))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_string() {
        let timestamp = Utc.with_ymd_and_hms(2021, 2, 5, 9, 30, 0).unwrap();
        assert_eq!(date_string(&timestamp), "Fri, 5 February 2021");
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label("roll-and-write").as_deref(), Some("roll and write"));
        assert_eq!(option_label("created_at").as_deref(), Some("created at"));
        assert_eq!(option_label("votes"), None);
    }
}
