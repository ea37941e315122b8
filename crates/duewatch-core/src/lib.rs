//! duewatch-core
//!
//! Live countdown rendering for task due dates in an admin list view.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（RowId, RowStatus, RowRecord, Bucket, CountdownDisplay）
//! - **ports**: 抽象化レイヤー（Clock, CountdownSink）
//! - **registry**: 行の状態を保持するインメモリのレジストリ
//! - **app**: 注釈パス・描画パス・定期描画・ビューの mount / unmount
//! - **impls**: 実装（InMemorySink）
//! - **config**: しきい値と更新間隔
//! - **observability**: ログ設定

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod registry;

pub use app::{CountdownView, MountedView, ViewBuilder};
pub use config::CountdownConfig;
pub use error::DuewatchError;
