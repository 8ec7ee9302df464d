//! Fan-out behaviour: ordering, health filtering, base-tag handling and
//! cascade resolution.

mod common;

use common::{probe, supervisor_with, CallLog};
use dugout::{Outcome, Tag};

#[tokio::test]
async fn fan_out_hits_healthy_tasks_in_sorted_name_order() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log).build();
    let citrus = probe("citrus", &log).build();
    let bravo = probe("bravo", &log).build();
    let sup = supervisor_with(&[alpha, citrus, bravo]).await;

    sup.fan_out_tag(Tag::DownloadFinished).await;

    assert_eq!(
        log.take(),
        vec![
            "alpha:notify:download_finished",
            "bravo:notify:download_finished",
            "citrus:notify:download_finished",
        ]
    );
}

#[tokio::test]
async fn disabled_tasks_are_skipped_by_fan_out() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log).build();
    let bravo = probe("bravo", &log).fail_on("run").build();
    let sup = supervisor_with(&[alpha, bravo]).await;

    sup.tick().await;
    assert_eq!(sup.registry().is_healthy("bravo").await, Some(false));

    log.take();
    sup.fan_out_tag(Tag::UploadFinished).await;
    assert_eq!(log.take(), vec!["alpha:notify:upload_finished"]);
}

#[tokio::test]
async fn cascade_resolves_before_the_next_originating_dispatch() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log)
        .run_returns(Outcome::empty().with_notify(Tag::DownloadFinished))
        .build();
    let bravo = probe("bravo", &log)
        .notify_reply(Tag::DownloadFinished, vec![Tag::ScoresUpdated])
        .build();
    let citrus = probe("citrus", &log).build();
    let sup = supervisor_with(&[alpha, bravo, citrus]).await;

    sup.tick().await;

    // One sorted pass per tag; bravo's reply resolves fully before the tick
    // moves on to bravo's own run.
    assert_eq!(
        log.take(),
        vec![
            "alpha:run",
            "alpha:notify:download_finished",
            "bravo:notify:download_finished",
            "citrus:notify:download_finished",
            "alpha:notify:scores_updated",
            "bravo:notify:scores_updated",
            "citrus:notify:scores_updated",
            "bravo:run",
            "citrus:run",
        ]
    );
}

#[tokio::test]
async fn base_tag_advances_the_timestamp_without_fanning() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log).run_returns(Outcome::changed()).build();
    let bravo = probe("bravo", &log).build();
    let sup = supervisor_with(&[alpha, bravo]).await;

    let before = sup.registry().last_activity("alpha").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    sup.tick().await;

    let entries = log.take();
    assert!(entries.iter().all(|e| !e.contains(":notify:")), "{entries:?}");
    assert!(sup.registry().last_activity("alpha").await.unwrap() > before);
}

#[tokio::test]
async fn tags_fan_in_outcome_order() {
    let log = CallLog::new();
    let alpha = probe("alpha", &log)
        .run_returns(
            Outcome::empty()
                .with_notify(Tag::SimStarted)
                .with_notify(Tag::SimFinished),
        )
        .build();
    let sup = supervisor_with(&[alpha]).await;

    sup.tick().await;

    assert_eq!(
        log.take(),
        vec![
            "alpha:run",
            "alpha:notify:sim_started",
            "alpha:notify:sim_finished",
        ]
    );
}
