//! CountdownSink port - カウントダウン表示先の抽象化
//!
//! 行ごとに「カウントダウン用の空要素（スロット）」を 1 つ持ち、
//! レンダラーは毎回その内容を上書きします。
//! DOM でも端末でもテスト用のメモリでもよい。

use crate::domain::{CountdownDisplay, RowId};

/// Result of writing one display into a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotUpdate {
    /// The slot existed and now holds the new display.
    Written,
    /// The row has no countdown slot; nothing was updated.
    MissingSlot,
}

/// CountdownSink はカウントダウンの描画先
///
/// # 契約
/// - `attach` は空のスロットを作る（既にあれば何もしない）
/// - `write` はスロットの内容を上書きする
/// - スロットが無い行への `write` は失敗ではなく `MissingSlot`
pub trait CountdownSink: Send + Sync {
    fn attach(&self, row: &RowId);

    fn write(&self, row: &RowId, display: &CountdownDisplay) -> SlotUpdate;
}

impl<S: CountdownSink + ?Sized> CountdownSink for std::sync::Arc<S> {
    fn attach(&self, row: &RowId) {
        (**self).attach(row)
    }

    fn write(&self, row: &RowId, display: &CountdownDisplay) -> SlotUpdate {
        (**self).write(row, display)
    }
}
