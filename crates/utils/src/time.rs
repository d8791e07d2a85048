use chrono::{DateTime, Utc};

/// Compact timestamp used by list views.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 33).unwrap();
        assert_eq!(format_timestamp(&timestamp), "2025-03-09 14:05");
    }
}
