//! Row registry: annotated row state keyed by row identity.
//!
//! The registry replaces attributes stored on page elements. Presentation is
//! re-derived from it on every render pass.

mod memory;

pub use self::memory::RowRegistry;

use std::sync::Arc;

use tokio::sync::RwLock;

/// Registry shared between the mounted view and its refresh task.
pub type SharedRegistry = Arc<RwLock<RowRegistry>>;
