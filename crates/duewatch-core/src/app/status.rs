//! Status - バケットごとの件数
//!
//! ダッシュボードの「期限切れ」「24 時間以内」カウンタに相当する集計。

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Bucket, CountdownDisplay};
use crate::registry::RowRegistry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub overdue: usize,
    pub due_soon: usize,
    pub normal: usize,
    /// Completed or cancelled rows (never bucketed).
    pub inactive: usize,
}

impl BucketCounts {
    pub fn active(&self) -> usize {
        self.overdue + self.due_soon + self.normal
    }
}

/// Count rows per bucket as of `now`.
pub fn summarize(
    registry: &RowRegistry,
    now: DateTime<Utc>,
    due_soon_threshold: TimeDelta,
) -> BucketCounts {
    let mut counts = BucketCounts::default();
    for (_, record) in registry.iter() {
        if !record.status().is_active() {
            counts.inactive += 1;
            continue;
        }
        match CountdownDisplay::compute(record.due_date() - now, due_soon_threshold).bucket {
            Bucket::Overdue => counts.overdue += 1,
            Bucket::DueSoon => counts.due_soon += 1,
            Bucket::Normal => counts.normal += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RowId, RowRecord, RowStatus};
    use chrono::TimeZone;

    #[test]
    fn counts_each_bucket_and_inactive_rows() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut reg = RowRegistry::new();
        let rows = [
            ("a", TimeDelta::hours(-1), RowStatus::Active),
            ("b", TimeDelta::hours(-100), RowStatus::Active),
            ("c", TimeDelta::hours(3), RowStatus::Active),
            ("d", TimeDelta::hours(48), RowStatus::Active),
            ("e", TimeDelta::hours(-1), RowStatus::Completed),
            ("f", TimeDelta::hours(1), RowStatus::Cancelled),
        ];
        for (id, offset, status) in rows {
            reg.insert(RowId::new(id), RowRecord::new(now + offset, status));
        }

        let counts = summarize(&reg, now, TimeDelta::hours(24));

        assert_eq!(
            counts,
            BucketCounts {
                overdue: 2,
                due_soon: 1,
                normal: 1,
                inactive: 2,
            }
        );
        assert_eq!(counts.active(), 4);
    }

    #[test]
    fn empty_registry_counts_nothing() {
        let counts = summarize(&RowRegistry::new(), Utc::now(), TimeDelta::hours(24));
        assert_eq!(counts, BucketCounts::default());
    }
}
