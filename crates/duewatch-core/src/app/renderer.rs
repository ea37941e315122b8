//! CountdownRenderer - 描画パス
//!
//! レジストリの ACTIVE な行ごとに `due_date - now` を計算してバケットに分類し、
//! 行のスロットを上書きします。
//!
//! - COMPLETED / CANCELLED の行には触れない
//! - スロットが無い行は何もしない（エラーではない）
//! - 同じ `now` なら何度呼んでも同じ出力（冪等）

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::CountdownDisplay;
use crate::ports::{Clock, CountdownSink, SlotUpdate};
use crate::registry::{RowRegistry, SharedRegistry};

/// Outcome counts of one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderReport {
    pub rendered: usize,
    pub inactive: usize,
    pub missing_slot: usize,
}

/// Render every active row of `registry` as of `now`.
pub fn render_pass<S>(
    registry: &RowRegistry,
    now: DateTime<Utc>,
    due_soon_threshold: TimeDelta,
    sink: &S,
) -> RenderReport
where
    S: CountdownSink + ?Sized,
{
    let mut report = RenderReport::default();

    for (id, record) in registry.iter() {
        if !record.status().is_active() {
            report.inactive += 1;
            continue;
        }

        let display = CountdownDisplay::compute(record.due_date() - now, due_soon_threshold);
        match sink.write(id, &display) {
            SlotUpdate::Written => report.rendered += 1,
            SlotUpdate::MissingSlot => report.missing_slot += 1,
        }
    }

    report
}

/// Renderer bound to a registry, a sink and a clock.
#[derive(Clone)]
pub struct CountdownRenderer {
    registry: SharedRegistry,
    sink: Arc<dyn CountdownSink>,
    clock: Arc<dyn Clock>,
    due_soon_threshold: TimeDelta,
}

impl CountdownRenderer {
    pub fn new(
        registry: SharedRegistry,
        sink: Arc<dyn CountdownSink>,
        clock: Arc<dyn Clock>,
        due_soon_threshold: TimeDelta,
    ) -> Self {
        Self {
            registry,
            sink,
            clock,
            due_soon_threshold,
        }
    }

    /// One render pass at the clock's current time.
    pub async fn render(&self) -> RenderReport {
        let now = self.clock.now();
        let registry = self.registry.read().await;
        let report = render_pass(&registry, now, self.due_soon_threshold, self.sink.as_ref());
        debug!(%now, ?report, "render pass finished");
        report
    }

    pub fn due_soon_threshold(&self) -> TimeDelta {
        self.due_soon_threshold
    }
}
