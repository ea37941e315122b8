use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use chrono::{TimeZone, Utc};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};

use duewatch_core::app::{CountdownView, MountedView, RenderedRow, TypedRow};
use duewatch_core::domain::{CountdownDisplay, RowId};
use duewatch_core::observability::{DEFAULT_LOG_LEVEL, LogFormat, init_logging};
use duewatch_core::ports::{CountdownSink, SlotUpdate};
use duewatch_core::{CountdownConfig, ViewBuilder};

#[derive(Parser)]
#[command(name = "duewatch", about = "Live due-date countdowns for a task list snapshot")]
struct Cli {
    /// Page snapshot (JSON) holding the list view rows.
    rows: PathBuf,

    #[arg(long, env = "DUEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Stop after this many refreshes instead of waiting for Ctrl-C.
    #[arg(long)]
    ticks: Option<u32>,

    /// Read due-date cells as UTC instead of the local time zone.
    #[arg(long)]
    utc: bool,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty)]
    log_format: LogFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

/// Rows as exported from the list view.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Snapshot {
    Rendered { rows: Vec<RenderedRow> },
    Typed { rows: Vec<TypedRow> },
}

/// Prints every countdown update as one line.
#[derive(Default)]
struct TerminalSink {
    slots: Mutex<HashSet<RowId>>,
}

impl CountdownSink for TerminalSink {
    fn attach(&self, row: &RowId) {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(row.clone());
    }

    fn write(&self, row: &RowId, display: &CountdownDisplay) -> SlotUpdate {
        let has_slot = self
            .slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(row);
        if !has_slot {
            return SlotUpdate::MissingSlot;
        }
        println!("{row:<38} {:<9} {display}", display.color());
        SlotUpdate::Written
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid snapshot {}", path.display()))
}

/// How long to stay mounted for `ticks` refreshes.
fn run_duration(interval: Duration, ticks: u32) -> Result<Duration> {
    interval
        .checked_mul(ticks)
        .and_then(|d| d.checked_add(Duration::from_millis(50)))
        .ok_or_else(|| anyhow!("{ticks} refreshes of {interval:?} overflow the run duration"))
}

async fn mount<Tz: TimeZone>(view: &CountdownView<Tz>, snapshot: &Snapshot) -> MountedView {
    match snapshot {
        Snapshot::Rendered { rows } => view.mount_rendered(rows).await,
        Snapshot::Typed { rows } => view.mount_typed(rows).await,
    }
}

async fn run<Tz: TimeZone>(
    view: CountdownView<Tz>,
    snapshot: Snapshot,
    ticks: Option<u32>,
) -> Result<()> {
    let interval = view.config().refresh_interval();
    let mounted = mount(&view, &snapshot).await;
    let annotation = mounted.annotation();
    println!(
        "annotated {} rows ({} skipped, {} failed)",
        annotation.annotated, annotation.skipped, annotation.failed
    );

    match ticks {
        Some(n) => sleep(run_duration(interval, n)?).await,
        None => tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?,
    }

    if !mounted.is_refreshing() {
        warn!("countdown refresh stopped before shutdown");
    }

    for (id, record) in mounted.records().await {
        println!(
            "{id:<38} {:<9} due {}",
            record.status().as_str(),
            record.due_date_iso()
        );
    }

    let counts = mounted.summary().await;
    let refreshed = mounted.unmount().await;
    info!(refreshed, "stopped");
    println!(
        "overdue={} due_soon={} normal={} inactive={}",
        counts.overdue, counts.due_soon, counts.normal, counts.inactive
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Json => LogFormat::Json,
    };
    init_logging(DEFAULT_LOG_LEVEL, format).map_err(|e| anyhow!(e))?;

    let config = match &cli.config {
        Some(path) => CountdownConfig::load(path)?,
        None => CountdownConfig::default(),
    };
    let snapshot = load_snapshot(&cli.rows)?;
    let sink = Arc::new(TerminalSink::default());

    let builder = ViewBuilder::new().config(config).sink(sink);
    if cli.utc {
        run(builder.time_zone(Utc).build()?, snapshot, cli.ticks).await
    } else {
        run(builder.build()?, snapshot, cli.ticks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_duration_covers_all_ticks() {
        let d = run_duration(Duration::from_secs(60), 3).unwrap();
        assert_eq!(d, Duration::from_millis(180_050));
    }

    #[test]
    fn run_duration_overflow_is_an_error() {
        let err = run_duration(Duration::from_secs(u64::MAX / 2), 3).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn snapshot_kinds_parse() {
        let typed: Snapshot = serde_json::from_str(
            r#"{ "kind": "typed", "rows": [{ "id": "a", "due_date": null, "status": "PENDING" }] }"#,
        )
        .unwrap();
        assert!(matches!(typed, Snapshot::Typed { rows } if rows.len() == 1));

        let rendered: Snapshot =
            serde_json::from_str(r#"{ "kind": "rendered", "rows": [{ "id": "b" }] }"#).unwrap();
        assert!(matches!(rendered, Snapshot::Rendered { rows } if rows[0].due_date_cell.is_none()));
    }
}
