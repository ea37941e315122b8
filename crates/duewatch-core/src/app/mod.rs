//! App - アプリケーション層
//!
//! ports と registry を組み合わせてカウントダウンの処理を実装します。
//!
//! # 主要コンポーネント
//! - **RowAnnotator**: 注釈パス（セルのテキスト → レジストリ）
//! - **CountdownRenderer**: 描画パス（レジストリ → スロット）
//! - **RefreshLoop**: 定期的な再描画（キャンセル可能）
//! - **ViewBuilder**: 構築とワイヤリング、mount / unmount
//! - **status**: バケットごとの件数

pub mod annotator;
pub mod builder;
pub mod refresh_loop;
pub mod renderer;
pub mod status;

pub use self::annotator::{AnnotateError, AnnotationReport, RenderedRow, RowAnnotator, TypedRow};
pub use self::builder::{CountdownView, MountedView, ViewBuilder};
pub use self::refresh_loop::{RefreshHandle, RefreshLoop};
pub use self::renderer::{CountdownRenderer, RenderReport, render_pass};
pub use self::status::{BucketCounts, summarize};
