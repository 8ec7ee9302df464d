//! Fault isolation: failures disable exactly one task, panics included, and
//! shadow delivery degrades silently.

mod common;

use std::sync::Arc;

use common::{probe, supervisor_with, CallLog};
use dugout::{Outcome, ShadowRecord, Tag};
use serde_json::json;

#[tokio::test]
async fn failing_run_disables_and_stamps_the_failure_time() {
    let log = CallLog::new();
    let bravo = probe("bravo", &log).fail_on("run").build();
    let sup = supervisor_with(&[bravo]).await;

    let before = chrono::Utc::now();
    sup.tick().await;
    let after = chrono::Utc::now();

    assert_eq!(sup.registry().is_healthy("bravo").await, Some(false));
    let at = sup.registry().last_activity("bravo").await.unwrap();
    assert!(at >= before && at <= after);

    // A disabled task gets no further contract calls.
    log.take();
    sup.tick().await;
    assert!(log.take().is_empty());
}

#[tokio::test]
async fn panicking_notify_disables_without_killing_the_dispatch() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log)
        .run_returns(Outcome::empty().with_notify(Tag::DownloadFinished))
        .build();
    let bravo = probe("bravo", &log).panic_on("notify").build();
    let citrus = probe("citrus", &log).build();
    let sup = supervisor_with(&[alpha, bravo, citrus]).await;

    sup.tick().await;

    assert_eq!(sup.registry().is_healthy("bravo").await, Some(false));
    // citrus was still notified after bravo blew up, and the tick finished.
    let entries = log.take();
    assert!(entries.contains(&"citrus:notify:download_finished".to_string()));
    assert!(entries.contains(&"citrus:run".to_string()));
}

#[tokio::test]
async fn failure_leaves_siblings_healthy() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log).build();
    let bravo = probe("bravo", &log).fail_on("run").build();
    let sup = supervisor_with(&[alpha, bravo]).await;

    sup.tick().await;

    assert_eq!(sup.registry().is_healthy("alpha").await, Some(true));
    assert_eq!(sup.registry().is_healthy("bravo").await, Some(false));
}

#[tokio::test]
async fn shadow_to_unregistered_destination_is_dropped_silently() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log)
        .run_returns(
            Outcome::empty().with_shadow(ShadowRecord::new("ghost", "lineup").unwrap()),
        )
        .build();
    let sup = supervisor_with(&[alpha]).await;

    sup.tick().await;

    assert_eq!(sup.registry().is_healthy("alpha").await, Some(true));
    assert!(log.take().iter().all(|e| !e.contains(":shadow:")));
}

#[tokio::test]
async fn shadow_to_disabled_destination_is_dropped() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log)
        .run_returns(
            Outcome::empty().with_shadow(ShadowRecord::new("bravo", "lineup").unwrap()),
        )
        .build();
    let bravo = probe("bravo", &log).fail_on("setup").build();
    let sup = supervisor_with(&[alpha, Arc::clone(&bravo)]).await;

    sup.setup_all().await; // bravo's setup fails → disabled
    log.take();
    sup.tick().await;

    assert!(log.take().iter().all(|e| !e.contains(":shadow:")));
    assert!(bravo.cache.is_empty());
}

#[tokio::test]
async fn delivered_shadow_lands_deep_copied_in_the_destination_cache() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log)
        .run_returns(
            Outcome::empty().with_shadow(
                ShadowRecord::new("standings", "record")
                    .unwrap()
                    .with_info(json!({"wins": 3, "losses": 1})),
            ),
        )
        .build();
    let standings = probe("standings", &log).build();
    let sup = supervisor_with(&[alpha, Arc::clone(&standings)]).await;

    sup.tick().await;

    assert!(log.take().contains(&"standings:shadow:record".to_string()));
    assert_eq!(standings.cache.get("record").unwrap()["wins"], 3);
}
