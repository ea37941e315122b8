//! Domain model (row identity, status, records, countdown buckets).

pub mod countdown;
pub mod ids;
pub mod record;
pub mod state;

pub use self::countdown::{Bucket, CountdownDisplay, IconKind};
pub use self::ids::RowId;
pub use self::record::RowRecord;
pub use self::state::{RowStatus, TaskStatus};
