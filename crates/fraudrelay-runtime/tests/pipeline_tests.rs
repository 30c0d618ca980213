//! Integration tests for the scoring pipeline
//!
//! Each test serves CSV payloads from a mockito server and writes the
//! snapshot into a temporary directory.

mod common;

use common::{TestRelay, TEN_ROWS_THREE_FLAGGED};
use fraudrelay_core::Value;
use fraudrelay_runtime::{ErrorKind, ScoringSummary};
use std::io::Write;
use std::time::Duration;

#[tokio::test]
async fn test_run_scores_and_persists() {
    let mut relay = TestRelay::new().await;
    let _m = relay.serve_csv("/tx.csv", TEN_ROWS_THREE_FLAGGED).await;

    let summary = relay.pipeline.run(&relay.request("/tx.csv")).await.unwrap();
    assert_eq!(summary, ScoringSummary { rows: 10, flagged: 3 });

    let snapshot = relay.pipeline.store().read().await.unwrap();
    assert_eq!(snapshot.len(), 10);
    assert_eq!(
        snapshot.dataset().columns(),
        &["amount", "hour", "is_fraud", "Fraud_Prediction"]
    );

    // Row order preserved: predictions line up with the source amounts.
    let amounts = snapshot.dataset().column("amount").unwrap();
    let preds = snapshot.dataset().column("Fraud_Prediction").unwrap();
    for (amount, pred) in amounts.iter().zip(preds.iter()) {
        let expected = u8::from(amount.as_f64().unwrap() > 500.0);
        assert_eq!(**pred, Value::from(expected));
    }
    assert_eq!(snapshot.dataset().get(3, "amount"), Some(&Value::Number(610.25)));
}

#[tokio::test]
async fn test_summarize_after_run() {
    let mut relay = TestRelay::new().await;
    let _m = relay.serve_csv("/tx.csv", TEN_ROWS_THREE_FLAGGED).await;

    relay.pipeline.run(&relay.request("/tx.csv")).await.unwrap();
    let summary = relay.pipeline.summarize().await.unwrap();

    assert_eq!(summary.rows, 10);
    assert_eq!(summary.flagged, 3);
}

#[tokio::test]
async fn test_summarize_without_snapshot() {
    let relay = TestRelay::new().await;

    let err = relay.pipeline.summarize().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
}

#[tokio::test]
async fn test_identical_input_gives_identical_snapshot() {
    let mut relay = TestRelay::new().await;
    let _m = relay.serve_csv("/tx.csv", TEN_ROWS_THREE_FLAGGED).await;

    relay.pipeline.run(&relay.request("/tx.csv")).await.unwrap();
    let first = relay.snapshot_bytes().await.unwrap();

    relay.pipeline.run(&relay.request("/tx.csv")).await.unwrap();
    let second = relay.snapshot_bytes().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unparseable_payload_leaves_snapshot_unchanged() {
    let mut relay = TestRelay::new().await;
    let _good = relay.serve_csv("/good.csv", TEN_ROWS_THREE_FLAGGED).await;
    let _bad = relay
        .serve_csv("/bad.csv", b"amount,hour,is_fraud\n1,2,0\n\xff\xfe\n".to_vec())
        .await;

    relay.pipeline.run(&relay.request("/good.csv")).await.unwrap();
    let before = relay.snapshot_bytes().await;

    let err = relay.pipeline.run(&relay.request("/bad.csv")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(relay.snapshot_bytes().await, before);
}

#[tokio::test]
async fn test_ragged_csv_is_parse_error() {
    let mut relay = TestRelay::new().await;
    let _m = relay
        .serve_csv("/ragged.csv", "amount,hour,is_fraud\n1,2,0\n3,4\n")
        .await;

    let err = relay.pipeline.run(&relay.request("/ragged.csv")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(relay.snapshot_bytes().await.is_none());
}

#[tokio::test]
async fn test_http_error_leaves_snapshot_unchanged() {
    let mut relay = TestRelay::new().await;
    let _good = relay.serve_csv("/good.csv", TEN_ROWS_THREE_FLAGGED).await;
    let _gone = relay
        .server
        .mock("GET", "/gone.csv")
        .with_status(500)
        .create_async()
        .await;

    relay.pipeline.run(&relay.request("/good.csv")).await.unwrap();
    let before = relay.snapshot_bytes().await;

    let err = relay.pipeline.run(&relay.request("/gone.csv")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert_eq!(relay.snapshot_bytes().await, before);
}

#[tokio::test]
async fn test_fetch_timeout_leaves_snapshot_unchanged() {
    let mut relay = TestRelay::new().await;
    let _good = relay.serve_csv("/good.csv", TEN_ROWS_THREE_FLAGGED).await;
    let _slow = relay
        .server
        .mock("GET", "/slow.csv")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(2));
            w.write_all(b"amount,hour,is_fraud\n700,1,1\n")
        })
        .create_async()
        .await;

    relay.pipeline.run(&relay.request("/good.csv")).await.unwrap();
    let before = relay.snapshot_bytes().await;

    let impatient = relay.pipeline_with_timeout(Duration::from_millis(200));
    let err = impatient.run(&relay.request("/slow.csv")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert_eq!(relay.snapshot_bytes().await, before);
    assert_eq!(
        relay.pipeline.summarize().await.unwrap(),
        ScoringSummary { rows: 10, flagged: 3 }
    );
}

#[tokio::test]
async fn test_missing_label_column_aborts() {
    let mut relay = TestRelay::new().await;
    let _m = relay.serve_csv("/nolabel.csv", "amount,hour\n900,3\n").await;

    let err = relay.pipeline.run(&relay.request("/nolabel.csv")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingLabel);
    assert!(relay.snapshot_bytes().await.is_none());
}

#[tokio::test]
async fn test_schema_mismatch_aborts() {
    let mut relay = TestRelay::new().await;
    let _m = relay
        .serve_csv("/reordered.csv", "hour,amount,is_fraud\n3,900,1\n")
        .await;

    let err = relay.pipeline.run(&relay.request("/reordered.csv")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    assert!(relay.snapshot_bytes().await.is_none());
}

#[tokio::test]
async fn test_non_numeric_feature_aborts() {
    let mut relay = TestRelay::new().await;
    let _m = relay
        .serve_csv("/text.csv", "amount,hour,is_fraud\nlots,3,1\n")
        .await;

    let err = relay.pipeline.run(&relay.request("/text.csv")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[tokio::test]
async fn test_concurrent_runs_never_tear_snapshot() {
    let mut relay = TestRelay::new().await;
    let _a = relay.serve_csv("/a.csv", TEN_ROWS_THREE_FLAGGED).await;
    let _b = relay
        .serve_csv("/b.csv", "amount,hour,is_fraud\n700,1,1\n20,2,0\n")
        .await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = relay.pipeline.clone();
        let request = relay.request(if i % 2 == 0 { "/a.csv" } else { "/b.csv" });
        handles.push(tokio::spawn(async move { pipeline.run(&request).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = relay.pipeline.store().read().await.unwrap();
    assert_eq!(snapshot.dataset().columns().len(), 4);
    let summary = ScoringSummary::from(&snapshot);
    assert!(
        summary == ScoringSummary { rows: 10, flagged: 3 }
            || summary == ScoringSummary { rows: 2, flagged: 1 },
        "unexpected snapshot contents: {:?}",
        summary
    );
}
