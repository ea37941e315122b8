//! RowAnnotator - 行の注釈パス
//!
//! サーバーが描画したセルのテキストから due date と状態を取り出し、
//! レジストリに登録します。ページ読み込み（mount）ごとに 1 回だけ実行し、
//! 最初の描画パスより必ず先に完了します。
//!
//! # フロー（行ごと）
//! 1. due date セルの 1 行目を取り出す
//! 2. `-`（期限なし）または `YYYY-MM-DD HH:MM` に一致しなければスキップ
//! 3. 閲覧者のタイムゾーンで時刻を組み立て（範囲外の値は繰り上げ）、UTC に正規化して登録
//! 4. カウントダウン用の空スロットを sink に追加
//! 5. ステータスバッジのテキストから RowStatus を分類
//!
//! 1 行の失敗はログに残してスキップし、他の行の処理は続けます。

use chrono::{DateTime, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{RowId, RowRecord, RowStatus, TaskStatus};
use crate::ports::CountdownSink;
use crate::registry::RowRegistry;

const NO_DUE_DATE: &str = "-";
const DUE_DATE_PATTERN: &str = r"([0-9]{4})-([0-9]{2})-([0-9]{2}) ([0-9]{2}):([0-9]{2})";

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("failed to compile due-date pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("due date {text:?} is outside the representable range")]
    InvalidComponents { text: String },

    #[error("due date {text:?} does not exist in the viewer's time zone")]
    NonexistentLocalTime { text: String },
}

/// A row as rendered by the server: cell text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub id: RowId,
    /// Text of the due-date cell; `None` when the row has no such cell.
    #[serde(default)]
    pub due_date_cell: Option<String>,
    /// Text of the status badge cell.
    #[serde(default)]
    pub status_badge: Option<String>,
}

/// A row handed over by the data source with typed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedRow {
    pub id: RowId,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
}

/// Outcome counts of one annotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub annotated: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct RowAnnotator<Tz: TimeZone> {
    tz: Tz,
    pattern: Regex,
}

impl RowAnnotator<Local> {
    /// Annotator that reads due dates in the machine's local time zone.
    pub fn local() -> Result<Self, AnnotateError> {
        Self::new(Local)
    }
}

impl<Tz: TimeZone> RowAnnotator<Tz> {
    pub fn new(tz: Tz) -> Result<Self, AnnotateError> {
        Ok(Self {
            tz,
            pattern: Regex::new(DUE_DATE_PATTERN)?,
        })
    }

    /// Extract a due date from due-date cell text.
    ///
    /// Returns `Ok(None)` for the `-` sentinel, empty text, or text with no
    /// `YYYY-MM-DD HH:MM` match.
    pub fn parse_due_date(&self, cell: &str) -> Result<Option<DateTime<Utc>>, AnnotateError> {
        let first_line = cell.trim().lines().next().unwrap_or_default().trim();
        if first_line.is_empty() || first_line == NO_DUE_DATE {
            return Ok(None);
        }
        let Some(caps) = self.pattern.captures(first_line) else {
            return Ok(None);
        };

        let invalid = || AnnotateError::InvalidComponents {
            text: first_line.to_string(),
        };
        let field = |i: usize| -> Result<u32, AnnotateError> {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(invalid)
        };

        let (year, month, day) = (field(1)?, field(2)?, field(3)?);
        let (hour, minute) = (field(4)?, field(5)?);
        let naive = rolled_over(year as i32, month, day, hour, minute).ok_or_else(invalid)?;

        // a local time inside a DST gap moves forward past the gap
        let local = self
            .tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                let later = naive.checked_add_signed(TimeDelta::hours(1))?;
                self.tz.from_local_datetime(&later).earliest()
            })
            .ok_or_else(|| AnnotateError::NonexistentLocalTime {
                text: first_line.to_string(),
            })?;

        Ok(Some(local.with_timezone(&Utc)))
    }

    /// Annotation pass over server-rendered rows.
    pub fn annotate<S>(
        &self,
        rows: &[RenderedRow],
        registry: &mut RowRegistry,
        sink: &S,
    ) -> AnnotationReport
    where
        S: CountdownSink + ?Sized,
    {
        let mut report = AnnotationReport::default();

        for row in rows {
            let Some(cell) = row.due_date_cell.as_deref() else {
                report.skipped += 1;
                continue;
            };

            let due_date = match self.parse_due_date(cell) {
                Ok(Some(due_date)) => due_date,
                Ok(None) => {
                    debug!(row = %row.id, "no due date, skipping row");
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(row = %row.id, error = %err, "error parsing due date");
                    report.failed += 1;
                    continue;
                }
            };

            let status = row
                .status_badge
                .as_deref()
                .map(RowStatus::from_badge_text)
                .unwrap_or(RowStatus::Active);

            let record = RowRecord::new(due_date, status);
            register(row.id.clone(), record, registry, sink, &mut report);
        }

        debug!(?report, "annotation pass finished");
        report
    }

    /// Annotation pass over rows carrying typed values from the data source.
    pub fn annotate_typed<S>(
        &self,
        rows: &[TypedRow],
        registry: &mut RowRegistry,
        sink: &S,
    ) -> AnnotationReport
    where
        S: CountdownSink + ?Sized,
    {
        let mut report = AnnotationReport::default();

        for row in rows {
            let Some(due_date) = row.due_date else {
                report.skipped += 1;
                continue;
            };
            let record = RowRecord::new(due_date, row.status.into());
            register(row.id.clone(), record, registry, sink, &mut report);
        }

        debug!(?report, "typed annotation pass finished");
        report
    }
}

/// Build a local date-time the way a calendar constructor does: components
/// past their range carry into the next unit (`02-30` is `03-01`, `24:00` is
/// midnight of the next day, month `00` is December of the previous year).
fn rolled_over(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    let new_year = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let first_of_month = if month == 0 {
        new_year.checked_sub_months(Months::new(1))?
    } else {
        new_year.checked_add_months(Months::new(month - 1))?
    };
    let offset = TimeDelta::days(i64::from(day) - 1)
        + TimeDelta::hours(i64::from(hour))
        + TimeDelta::minutes(i64::from(minute));
    first_of_month.and_time(NaiveTime::MIN).checked_add_signed(offset)
}

fn register<S>(
    id: RowId,
    record: RowRecord,
    registry: &mut RowRegistry,
    sink: &S,
    report: &mut AnnotationReport,
) where
    S: CountdownSink + ?Sized,
{
    if registry.contains(&id) {
        debug!(row = %id, "row already annotated");
        report.skipped += 1;
        return;
    }
    sink.attach(&id);
    registry.insert(id, record);
    report.annotated += 1;
}
