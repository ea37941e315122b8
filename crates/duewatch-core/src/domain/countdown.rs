//! Countdown - 残り時間の分類と表示文字列
//!
//! `remaining = due_date - now` を 3 つのバケットに分類します。
//! 境界は半開区間: `[-∞, 0)` → Overdue, `[0, threshold)` → DueSoon,
//! `[threshold, ∞)` → Normal。
//!
//! 端数はすべて切り捨て（非負の大きさに対する floor）。

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Bucket of a row relative to the current time.
///
/// Ordered by severity so that `Normal < DueSoon < Overdue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Normal,
    DueSoon,
    Overdue,
}

impl Bucket {
    pub fn icon(self) -> IconKind {
        match self {
            Bucket::Overdue => IconKind::WarningTriangle,
            Bucket::DueSoon => IconKind::Clock,
            Bucket::Normal => IconKind::Calendar,
        }
    }

    /// Foreground color of the countdown text.
    pub fn color(self) -> &'static str {
        match self {
            Bucket::Overdue => "#C62828",
            Bucket::DueSoon => "#F57F17",
            Bucket::Normal => "#1565C0",
        }
    }
}

/// Icon marker rendered in front of the countdown text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    WarningTriangle,
    Clock,
    Calendar,
}

impl IconKind {
    /// Font Awesome classes used by the admin theme.
    pub fn css_class(self) -> &'static str {
        match self {
            IconKind::WarningTriangle => "fas fa-exclamation-triangle",
            IconKind::Clock => "fas fa-clock",
            IconKind::Calendar => "fas fa-calendar-alt",
        }
    }
}

/// CountdownDisplay は行のカウントダウン表示（書き込み専用の射影）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    pub bucket: Bucket,
    pub text: String,
}

impl CountdownDisplay {
    /// Classify `remaining` and format the text for its bucket.
    ///
    /// `due_soon_threshold` is the upper (exclusive) bound of the DueSoon
    /// bucket; 24 hours by default.
    pub fn compute(remaining: TimeDelta, due_soon_threshold: TimeDelta) -> Self {
        let remaining_ms = remaining.num_milliseconds();
        let threshold_ms = due_soon_threshold.num_milliseconds();

        if remaining_ms < 0 {
            let overdue_ms = remaining_ms.abs();
            let days = overdue_ms / MS_PER_DAY;
            let hours = (overdue_ms % MS_PER_DAY) / MS_PER_HOUR;
            let text = if days > 0 {
                format!("Overdue by {days}d {hours}h")
            } else {
                format!("Overdue by {hours}h")
            };
            Self {
                bucket: Bucket::Overdue,
                text,
            }
        } else if remaining_ms < threshold_ms {
            let hours = remaining_ms / MS_PER_HOUR;
            let minutes = (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE;
            let text = if hours > 0 {
                format!("{hours}h {minutes}m left")
            } else {
                format!("{minutes}m left")
            };
            Self {
                bucket: Bucket::DueSoon,
                text,
            }
        } else {
            let days = remaining_ms / MS_PER_DAY;
            let hours = (remaining_ms % MS_PER_DAY) / MS_PER_HOUR;
            Self {
                bucket: Bucket::Normal,
                text: format!("{days}d {hours}h left"),
            }
        }
    }

    pub fn icon(&self) -> IconKind {
        self.bucket.icon()
    }

    pub fn color(&self) -> &'static str {
        self.bucket.color()
    }

    /// Markup written into the countdown slot: icon marker, then the text.
    pub fn to_html(&self) -> String {
        format!(r#"<i class="{}"></i> {}"#, self.icon().css_class(), self.text)
    }

    /// Inline style applied to the countdown slot.
    pub fn style(&self) -> String {
        format!("color: {}", self.color())
    }
}

impl fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day() -> TimeDelta {
        TimeDelta::hours(24)
    }

    #[test]
    fn ninety_minutes_is_due_soon() {
        let d = CountdownDisplay::compute(TimeDelta::minutes(90), day());
        assert_eq!(d.bucket, Bucket::DueSoon);
        assert_eq!(d.text, "1h 30m left");
        assert_eq!(d.color(), "#F57F17");
        assert_eq!(d.icon(), IconKind::Clock);
    }

    #[test]
    fn thirty_hours_ago_is_overdue() {
        let d = CountdownDisplay::compute(TimeDelta::hours(-30), day());
        assert_eq!(d.bucket, Bucket::Overdue);
        assert_eq!(d.text, "Overdue by 1d 6h");
        assert_eq!(d.color(), "#C62828");
        assert_eq!(d.icon(), IconKind::WarningTriangle);
    }

    #[test]
    fn fifty_hours_ahead_is_normal() {
        let d = CountdownDisplay::compute(TimeDelta::hours(50), day());
        assert_eq!(d.bucket, Bucket::Normal);
        assert_eq!(d.text, "2d 2h left");
        assert_eq!(d.color(), "#1565C0");
        assert_eq!(d.icon(), IconKind::Calendar);
    }

    #[rstest]
    #[case::one_ms_late(TimeDelta::milliseconds(-1), Bucket::Overdue, "Overdue by 0h")]
    #[case::exactly_now(TimeDelta::zero(), Bucket::DueSoon, "0m left")]
    #[case::just_under_a_day(TimeDelta::hours(24) - TimeDelta::milliseconds(1), Bucket::DueSoon, "23h 59m left")]
    #[case::exactly_a_day(TimeDelta::hours(24), Bucket::Normal, "1d 0h left")]
    #[case::minutes_only(TimeDelta::seconds(59 * 60 + 59), Bucket::DueSoon, "59m left")]
    #[case::overdue_hours_only(TimeDelta::minutes(-(23 * 60 + 59)), Bucket::Overdue, "Overdue by 23h")]
    #[case::overdue_exact_day(TimeDelta::hours(-24), Bucket::Overdue, "Overdue by 1d 0h")]
    fn half_open_boundaries(
        #[case] remaining: TimeDelta,
        #[case] bucket: Bucket,
        #[case] text: &str,
    ) {
        let d = CountdownDisplay::compute(remaining, day());
        assert_eq!(d.bucket, bucket);
        assert_eq!(d.text, text);
    }

    #[test]
    fn custom_threshold_moves_due_soon_boundary() {
        let threshold = TimeDelta::hours(2);
        let d = CountdownDisplay::compute(TimeDelta::hours(3), threshold);
        assert_eq!(d.bucket, Bucket::Normal);
        assert_eq!(d.text, "0d 3h left");

        let d = CountdownDisplay::compute(TimeDelta::minutes(119), threshold);
        assert_eq!(d.bucket, Bucket::DueSoon);
    }

    #[test]
    fn bucket_only_grows_in_severity_as_time_passes() {
        // due in 26h; step "now" forward in 30 minute increments
        let due = TimeDelta::hours(26);
        let mut previous = Bucket::Normal;
        for step in 0..120 {
            let remaining = due - TimeDelta::minutes(30 * step);
            let bucket = CountdownDisplay::compute(remaining, day()).bucket;
            assert!(bucket >= previous, "bucket moved backwards at step {step}");
            previous = bucket;
        }
        assert_eq!(previous, Bucket::Overdue);
    }

    #[test]
    fn html_fragment_has_icon_then_text() {
        let d = CountdownDisplay::compute(TimeDelta::minutes(90), day());
        assert_eq!(d.to_html(), r#"<i class="fas fa-clock"></i> 1h 30m left"#);
        assert_eq!(d.style(), "color: #F57F17");
    }
}
