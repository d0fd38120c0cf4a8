//! Parallel ECHO batches and their aggregate verdicts.

use crate::common::tcp_harness::*;
use linecheck_core::ledger::ResultLedger;
use linecheck_harness::concurrency::{record_batch, run_batch};
use linecheck_harness::{ClientOutcome, Connector};
use tokio::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ten_clients_five_commands_all_succeed() {
    let server = LineTestServer::start().await;
    let connector = server.connector();

    let report = run_batch(&connector, 10, 5, Duration::from_secs(2)).await;

    assert_eq!(report.succeeded, 10);
    assert!(report.is_success());
    assert!(report.outcomes.iter().all(|o| *o == ClientOutcome::Completed));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn passing_batch_is_named_after_client_count() {
    let server = LineTestServer::start().await;
    let mut ledger = ResultLedger::new();

    record_batch(&server.connector(), &mut ledger, 20, 5, Duration::from_secs(2)).await;

    assert_eq!(ledger.passed(), 1);
    assert_eq!(ledger.total(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_bad_client_fails_the_batch() {
    // Only client 1 has its echoes corrupted.
    let server = LineTestServer::start_with(Behavior::CorruptEcho("Client1_")).await;
    let mut ledger = ResultLedger::new();

    let report = record_batch(&server.connector(), &mut ledger, 3, 2, Duration::from_secs(2)).await;

    assert_eq!(report.succeeded, 2);
    assert!(matches!(
        &report.outcomes[1],
        ClientOutcome::Mismatch { actual, .. } if actual == "WrongEcho"
    ));
    assert_eq!(ledger.failed(), 1);
    let failure = &ledger.failures()[0];
    assert_eq!(failure.test, "Concurrent connections");
    assert_eq!(failure.reason, "Only 2/3 clients succeeded (1 wrong response)");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unreachable_server_counts_connection_errors() {
    let port = vacant_port().await;
    let connector = Connector::new(format!("127.0.0.1:{port}"), Duration::from_millis(300), 4096);

    let report = run_batch(&connector, 3, 2, Duration::from_secs(1)).await;

    assert_eq!(report.succeeded, 0);
    assert!(report.outcomes.iter().all(|o| matches!(o, ClientOutcome::Failed(_))));
    assert_eq!(report.failure_reason(), "Only 0/3 clients succeeded (3 connection error)");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn clients_past_wait_bound_are_cancelled() {
    let server = LineTestServer::start_with(Behavior::Silent).await;
    // Per-request timeout longer than the wait bound, so the bound fires first.
    let connector = Connector::new(server.addr(), Duration::from_secs(5), 4096);

    let started = tokio::time::Instant::now();
    let report = run_batch(&connector, 4, 1, Duration::from_millis(200)).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(report.succeeded, 0);
    assert!(report.outcomes.iter().all(|o| *o == ClientOutcome::TimedOut));
    assert_eq!(report.failure_reason(), "Only 0/4 clients succeeded (4 timed out)");
}
