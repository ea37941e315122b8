//! RefreshLoop - 定期的な再描画
//!
//! mount 時に起動し、unmount 時に止める所有権付きの周期タスク。
//!
//! # フロー
//! 1. interval ごとに CountdownRenderer::render() を呼ぶ
//! 2. shutdown が来たら次の tick を待たずに抜ける
//!
//! 最初の tick は spawn から 1 interval 後（初回描画は mount 側で済ませる）。

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::renderer::CountdownRenderer;

pub struct RefreshLoop;

impl RefreshLoop {
    /// Start re-rendering every `interval`.
    pub fn spawn(renderer: CountdownRenderer, interval: Duration) -> RefreshHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let first_tick = Instant::now() + interval;
        let join = tokio::spawn(refresh_loop(renderer, first_tick, interval, shutdown_rx));
        RefreshHandle {
            shutdown_tx,
            join: Some(join),
        }
    }
}

/// Refresh task handle.
/// - `request_shutdown()` で次の tick 以降の描画を止める
/// - `shutdown_and_join()` でタスクの終了まで待つ
/// - handle を drop してもループは止まる（sender が drop されるため）
pub struct RefreshHandle {
    shutdown_tx: watch::Sender<bool>,
    join: Option<JoinHandle<u64>>,
}

impl RefreshHandle {
    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the loop and wait for it. Returns the number of ticks rendered.
    pub async fn shutdown_and_join(mut self) -> u64 {
        self.request_shutdown();
        let Some(join) = self.join.take() else {
            return 0;
        };
        match join.await {
            Ok(ticks) => ticks,
            Err(err) => {
                warn!(error = %err, "countdown refresh task did not finish cleanly");
                0
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.request_shutdown();
    }
}

async fn refresh_loop(
    renderer: CountdownRenderer,
    first_tick: Instant,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = time::interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = 0u64;

    info!(interval_ms = period.as_millis() as u64, "countdown refresh started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender dropped: nobody owns this loop any more
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let report = renderer.render().await;
        ticks += 1;
        debug!(tick = ticks, ?report, "countdown refreshed");
    }
    info!(ticks, "countdown refresh stopped");
    ticks
}
