//! State - タスクと行の状態
//!
//! - `TaskStatus`: データソース側（サーバー）のタスク状態
//! - `RowStatus`: カウントダウン描画の対象かどうかを決める行の状態

use serde::{Deserialize, Serialize};

/// TaskStatus はサーバー側のタスク状態
///
/// 型付きでデータソースから直接受け取る経路で使います。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Deferred,
    Cancelled,
}

/// RowStatus は行の状態（描画対象かどうか）
///
/// # 状態
/// - active: カウントダウンを描画する
/// - completed / cancelled: 描画しない（どの描画パスでもスキップ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    Active,
    Completed,
    Cancelled,
}

impl RowStatus {
    /// Classify a rendered status badge.
    ///
    /// `COMPLETED` is checked before `CANCELLED`; anything else is active.
    pub fn from_badge_text(text: &str) -> Self {
        let text = text.trim();
        if text.contains("COMPLETED") {
            RowStatus::Completed
        } else if text.contains("CANCELLED") {
            RowStatus::Cancelled
        } else {
            RowStatus::Active
        }
    }

    /// Does the renderer touch rows in this state?
    pub fn is_active(self) -> bool {
        matches!(self, RowStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Active => "ACTIVE",
            RowStatus::Completed => "COMPLETED",
            RowStatus::Cancelled => "CANCELLED",
        }
    }
}

impl From<TaskStatus> for RowStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Completed => RowStatus::Completed,
            TaskStatus::Cancelled => RowStatus::Cancelled,
            TaskStatus::Pending | TaskStatus::InProgress | TaskStatus::Deferred => {
                RowStatus::Active
            }
        }
    }
}
