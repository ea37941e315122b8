//! ViewBuilder - カウントダウンビューの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - mount / unmount によるライフサイクル管理

use std::sync::Arc;

use chrono::{Local, TimeZone};
use tokio::sync::RwLock;
use tracing::info;

use super::annotator::{AnnotationReport, RenderedRow, RowAnnotator, TypedRow};
use super::refresh_loop::{RefreshHandle, RefreshLoop};
use super::renderer::{CountdownRenderer, RenderReport};
use super::status::{self, BucketCounts};
use crate::config::CountdownConfig;
use crate::domain::{RowId, RowRecord};
use crate::error::DuewatchError;
use crate::ports::{Clock, CountdownSink, SystemClock};
use crate::registry::{RowRegistry, SharedRegistry};

/// ViewBuilder はカウントダウンビューを構築
///
/// # 使用例
/// ```ignore
/// let view = ViewBuilder::new()
///     .config(config)
///     .sink(sink.clone())
///     .build()?;
/// let mounted = view.mount_rendered(&rows).await;
/// // ...
/// mounted.unmount().await;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に config を検証
/// - sink が未設定なら DuewatchError::MissingSink
pub struct ViewBuilder<Tz: TimeZone = Local> {
    config: CountdownConfig,
    clock: Arc<dyn Clock>,
    sink: Option<Arc<dyn CountdownSink>>,
    tz: Tz,
}

impl ViewBuilder<Local> {
    /// 新しい ViewBuilder を作成（ローカルタイムゾーン、システム時計）
    pub fn new() -> Self {
        Self {
            config: CountdownConfig::default(),
            clock: Arc::new(SystemClock),
            sink: None,
            tz: Local,
        }
    }
}

impl Default for ViewBuilder<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> ViewBuilder<Tz> {
    pub fn config(mut self, config: CountdownConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn sink<S: CountdownSink + 'static>(mut self, sink: Arc<S>) -> Self {
        let sink: Arc<dyn CountdownSink> = sink;
        self.sink = Some(sink);
        self
    }

    /// 閲覧者のタイムゾーンを差し替え（セルの時刻はこのタイムゾーンで解釈）
    pub fn time_zone<T: TimeZone>(self, tz: T) -> ViewBuilder<T> {
        ViewBuilder {
            config: self.config,
            clock: self.clock,
            sink: self.sink,
            tz,
        }
    }

    pub fn build(self) -> Result<CountdownView<Tz>, DuewatchError> {
        self.config.validate()?;
        let sink = self.sink.ok_or(DuewatchError::MissingSink)?;
        Ok(CountdownView {
            annotator: RowAnnotator::new(self.tz)?,
            config: self.config,
            clock: self.clock,
            sink,
        })
    }
}

/// CountdownView は 1 つの一覧ビューに対応
///
/// mount ごとに新しいレジストリを作るので、ページ読み込みのたびに
/// 同じビューを再利用できます。
pub struct CountdownView<Tz: TimeZone = Local> {
    annotator: RowAnnotator<Tz>,
    config: CountdownConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn CountdownSink>,
}

impl<Tz: TimeZone> CountdownView<Tz> {
    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    /// Mount over server-rendered rows: annotate, render once, start refreshing.
    pub async fn mount_rendered(&self, rows: &[RenderedRow]) -> MountedView {
        let mut registry = RowRegistry::new();
        let annotation = self.annotator.annotate(rows, &mut registry, self.sink.as_ref());
        self.start(registry, annotation).await
    }

    /// Mount over rows carrying typed status and due date.
    pub async fn mount_typed(&self, rows: &[TypedRow]) -> MountedView {
        let mut registry = RowRegistry::new();
        let annotation = self
            .annotator
            .annotate_typed(rows, &mut registry, self.sink.as_ref());
        self.start(registry, annotation).await
    }

    async fn start(&self, registry: RowRegistry, annotation: AnnotationReport) -> MountedView {
        // annotation is complete before any render can read the registry
        let registry: SharedRegistry = Arc::new(RwLock::new(registry));
        let renderer = CountdownRenderer::new(
            registry.clone(),
            self.sink.clone(),
            self.clock.clone(),
            self.config.due_soon_threshold(),
        );

        let initial = renderer.render().await;
        info!(?annotation, ?initial, "countdown view mounted");

        let refresh = RefreshLoop::spawn(renderer.clone(), self.config.refresh_interval());
        MountedView {
            registry,
            renderer,
            clock: self.clock.clone(),
            annotation,
            initial,
            refresh,
        }
    }
}

/// MountedView は mount 済みのビュー
///
/// drop または unmount() で定期描画が止まります。
pub struct MountedView {
    registry: SharedRegistry,
    renderer: CountdownRenderer,
    clock: Arc<dyn Clock>,
    annotation: AnnotationReport,
    initial: RenderReport,
    refresh: RefreshHandle,
}

impl MountedView {
    pub fn annotation(&self) -> AnnotationReport {
        self.annotation
    }

    /// Report of the render pass run at mount.
    pub fn initial_render(&self) -> RenderReport {
        self.initial
    }

    /// Render immediately, outside the refresh cadence.
    pub async fn render_now(&self) -> RenderReport {
        self.renderer.render().await
    }

    pub async fn summary(&self) -> BucketCounts {
        let registry = self.registry.read().await;
        status::summarize(
            &registry,
            self.clock.now(),
            self.renderer.due_soon_threshold(),
        )
    }

    pub async fn record(&self, id: &RowId) -> Option<RowRecord> {
        self.registry.read().await.get(id).cloned()
    }

    /// Annotated rows in display order.
    pub async fn records(&self) -> Vec<(RowId, RowRecord)> {
        self.registry
            .read()
            .await
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }

    /// Is the refresh task still running?
    pub fn is_refreshing(&self) -> bool {
        !self.refresh.is_finished()
    }

    pub async fn row_count(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Stop refreshing and wait for the refresh task. Returns the tick count.
    pub async fn unmount(self) -> u64 {
        let ticks = self.refresh.shutdown_and_join().await;
        info!(ticks, "countdown view unmounted");
        ticks
    }
}
