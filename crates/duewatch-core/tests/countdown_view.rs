//! End-to-end: mount a list view, let the refresh loop tick, unmount.

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, TimeDelta, TimeZone, Utc};
use duewatch_core::app::{RenderedRow, TypedRow};
use duewatch_core::domain::{RowId, TaskStatus};
use duewatch_core::impls::InMemorySink;
use duewatch_core::ports::FixedClock;
use duewatch_core::{CountdownConfig, ViewBuilder};

fn rendered(id: &str, due: &str, badge: &str) -> RenderedRow {
    RenderedRow {
        id: RowId::new(id),
        due_date_cell: Some(due.to_string()),
        status_badge: Some(badge.to_string()),
    }
}

fn html(sink: &InMemorySink, id: &str) -> String {
    sink.slot(&RowId::new(id)).unwrap().html
}

#[tokio::test(start_paused = true)]
async fn change_list_page_counts_down_every_minute() {
    // viewer in UTC+02:00, page loaded at 10:00 local time
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let start = tz.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap().with_timezone(&Utc);
    let clock = FixedClock::new(start);
    let sink = Arc::new(InMemorySink::new());

    let view = ViewBuilder::new()
        .time_zone(tz)
        .clock(clock.clone())
        .sink(sink.clone())
        .build()
        .unwrap();

    let rows = vec![
        rendered("soon", "2024-06-01 11:30\nJun 1", "PENDING"),
        rendered("late", "2024-05-31 04:00", "IN_PROGRESS"),
        rendered("later", "2024-06-03 12:00", "DEFERRED"),
        rendered("done", "2024-05-01 09:00", "COMPLETED"),
        rendered("none", "-", "PENDING"),
        rendered("junk", "not-a-date", "PENDING"),
    ];

    let mounted = view.mount_rendered(&rows).await;
    assert_eq!(mounted.annotation().annotated, 4);
    assert_eq!(mounted.annotation().skipped, 2);

    assert!(html(&sink, "soon").ends_with("1h 30m left"));
    assert!(html(&sink, "late").ends_with("Overdue by 1d 6h"));
    assert!(html(&sink, "later").ends_with("2d 2h left"));
    assert!(html(&sink, "done").is_empty());
    assert!(sink.slot(&RowId::new("none")).is_none());
    assert!(sink.slot(&RowId::new("junk")).is_none());

    let counts = mounted.summary().await;
    assert_eq!((counts.overdue, counts.due_soon, counts.normal), (1, 1, 1));
    assert_eq!(counts.inactive, 1);

    // one minute later the loop re-renders with the new time
    clock.advance(TimeDelta::minutes(1));
    tokio::time::sleep(Duration::from_millis(60_001)).await;
    assert!(html(&sink, "soon").ends_with("1h 29m left"));
    assert_eq!(sink.slot(&RowId::new("soon")).unwrap().writes, 2);
    assert_eq!(sink.slot(&RowId::new("done")).unwrap().writes, 0);

    // two hours on, the due-soon row has become overdue
    clock.advance(TimeDelta::hours(2));
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(html(&sink, "soon").ends_with("Overdue by 0h"));

    let ticks = mounted.unmount().await;
    assert_eq!(ticks, 2);

    // nothing renders after unmount
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(sink.slot(&RowId::new("soon")).unwrap().writes, 3);
}

#[tokio::test(start_paused = true)]
async fn typed_rows_with_custom_cadence() {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let clock = FixedClock::new(start);
    let sink = Arc::new(InMemorySink::new());
    let config = CountdownConfig::from_json(
        r#"{ "due_soon_threshold_secs": 7200, "refresh_interval_ms": 1000 }"#,
    )
    .unwrap();

    let view = ViewBuilder::new()
        .config(config)
        .clock(clock.clone())
        .sink(sink.clone())
        .build()
        .unwrap();

    let rows = vec![
        TypedRow {
            id: RowId::new("a"),
            due_date: Some(start + TimeDelta::hours(3)),
            status: TaskStatus::Pending,
        },
        TypedRow {
            id: RowId::new("b"),
            due_date: Some(start - TimeDelta::hours(3)),
            status: TaskStatus::Cancelled,
        },
    ];

    let mounted = view.mount_typed(&rows).await;
    assert!(html(&sink, "a").ends_with("0d 3h left"));

    clock.advance(TimeDelta::hours(1) + TimeDelta::minutes(1));
    tokio::time::sleep(Duration::from_millis(1_001)).await;
    assert!(html(&sink, "a").ends_with("1h 59m left"));
    assert!(html(&sink, "b").is_empty());

    mounted.unmount().await;
}
