//! In-memory row registry.

use std::collections::HashMap;

use crate::domain::{RowId, RowRecord};

/// RowRegistry は注釈済みの行を保持
///
/// # 実装詳細
/// - HashMap<RowId, RowRecord> が正本
/// - `order` で注釈順（= 表示順）を保持し、描画順を決定的にする
/// - 一度登録した行の due_date は書き換えない
#[derive(Debug, Default)]
pub struct RowRegistry {
    records: HashMap<RowId, RowRecord>,
    order: Vec<RowId>,
}

impl RowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a row.
    ///
    /// Returns `false` and keeps the existing record when the row was already
    /// annotated.
    pub fn insert(&mut self, id: RowId, record: RowRecord) -> bool {
        if self.records.contains_key(&id) {
            return false;
        }
        self.order.push(id.clone());
        self.records.insert(id, record);
        true
    }

    pub fn get(&self, id: &RowId) -> Option<&RowRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.records.contains_key(id)
    }

    /// Rows in annotation order.
    pub fn iter(&self) -> impl Iterator<Item = (&RowId, &RowRecord)> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|record| (id, record)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
