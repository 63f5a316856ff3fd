use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::OrderNumberSource;

/// `ORD-{yyyyMMddHHmmssSSS}-{6 hex}`: sortable by time, random suffix so two
/// checkouts in the same millisecond still differ.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampOrderNumbers;

impl OrderNumberSource for TimestampOrderNumbers {
    fn next_master_number(&self, placed_at: DateTime<Utc>) -> String {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
        format!("ORD-{}-{}", placed_at.format("%Y%m%d%H%M%S%3f"), suffix)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn number_embeds_the_placement_time() {
        let at = Utc
            .with_ymd_and_hms(2026, 10, 19, 8, 30, 5)
            .single()
            .expect("valid timestamp");
        let number = TimestampOrderNumbers.next_master_number(at);

        assert!(number.starts_with("ORD-20261019083005000-"), "{number}");
        assert_eq!(number.len(), "ORD-20261019083005000-".len() + 6);
    }

    #[test]
    fn numbers_in_the_same_instant_differ() {
        let at = Utc::now();
        let a = TimestampOrderNumbers.next_master_number(at);
        let b = TimestampOrderNumbers.next_master_number(at);
        assert_ne!(a, b);
    }
}
