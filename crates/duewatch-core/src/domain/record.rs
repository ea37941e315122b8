use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RowStatus;

/// Annotated state of one row.
///
/// Created once by the annotation pass. `due_date` is never rewritten
/// afterwards; only the rendered countdown changes between ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    due_date: DateTime<Utc>,
    status: RowStatus,
}

impl RowRecord {
    pub fn new(due_date: DateTime<Utc>, status: RowStatus) -> Self {
        Self { due_date, status }
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn status(&self) -> RowStatus {
        self.status
    }

    /// Due date as the normalized ISO-8601 string the page script stored on the row.
    pub fn due_date_iso(&self) -> String {
        self.due_date
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}
