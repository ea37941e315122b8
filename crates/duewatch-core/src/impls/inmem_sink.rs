//! InMemorySink - メモリ上のカウントダウン描画先
//!
//! 行ごとのスロット内容を HashMap に保持します。
//! テストや、描画結果をまとめて取り出したい埋め込み用途向け。

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{CountdownDisplay, RowId};
use crate::ports::{CountdownSink, SlotUpdate};

/// Content of one countdown slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// Markup currently held by the slot (empty until the first render).
    pub html: String,
    /// Inline style currently applied to the slot.
    pub style: String,
    /// Number of writes the slot has received.
    pub writes: u64,
}

#[derive(Default)]
pub struct InMemorySink {
    slots: Mutex<HashMap<RowId, Slot>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one slot, `None` when the row has no slot.
    pub fn slot(&self, row: &RowId) -> Option<Slot> {
        self.lock().get(row).cloned()
    }

    pub fn has_slot(&self, row: &RowId) -> bool {
        self.lock().contains_key(row)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove a row's slot, as if its element had been taken out of the page.
    pub fn detach(&self, row: &RowId) -> Option<Slot> {
        self.lock().remove(row)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<RowId, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CountdownSink for InMemorySink {
    fn attach(&self, row: &RowId) {
        self.lock().entry(row.clone()).or_default();
    }

    fn write(&self, row: &RowId, display: &CountdownDisplay) -> SlotUpdate {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(row) else {
            return SlotUpdate::MissingSlot;
        };
        slot.html = display.to_html();
        slot.style = display.style();
        slot.writes += 1;
        SlotUpdate::Written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn display() -> CountdownDisplay {
        CountdownDisplay::compute(TimeDelta::minutes(90), TimeDelta::hours(24))
    }

    #[test]
    fn attach_creates_empty_slot() {
        let sink = InMemorySink::new();
        let row = RowId::new("a");
        sink.attach(&row);

        let slot = sink.slot(&row).unwrap();
        assert!(slot.html.is_empty());
        assert_eq!(slot.writes, 0);
    }

    #[test]
    fn write_overwrites_slot() {
        let sink = InMemorySink::new();
        let row = RowId::new("a");
        sink.attach(&row);

        assert_eq!(sink.write(&row, &display()), SlotUpdate::Written);
        assert_eq!(sink.write(&row, &display()), SlotUpdate::Written);

        let slot = sink.slot(&row).unwrap();
        assert_eq!(slot.html, r#"<i class="fas fa-clock"></i> 1h 30m left"#);
        assert_eq!(slot.style, "color: #F57F17");
        assert_eq!(slot.writes, 2);
    }

    #[test]
    fn write_without_slot_is_a_noop() {
        let sink = InMemorySink::new();
        let row = RowId::new("ghost");

        assert_eq!(sink.write(&row, &display()), SlotUpdate::MissingSlot);
        assert!(sink.is_empty());
    }

    #[test]
    fn attach_twice_keeps_existing_content() {
        let sink = InMemorySink::new();
        let row = RowId::new("a");
        sink.attach(&row);
        sink.write(&row, &display());
        sink.attach(&row);

        assert_eq!(sink.slot(&row).unwrap().writes, 1);
        assert_eq!(sink.len(), 1);
    }
}
