//! Whole runs through `suite::run`.

use crate::common::tcp_harness::*;
use linecheck_core::config::HarnessConfig;
use linecheck_core::error::HarnessError;
use linecheck_core::ledger::ResultLedger;
use linecheck_harness::suite;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn conforming_server_passes_everything() {
    let server = LineTestServer::start().await;
    let config = server.config();
    let mut ledger = ResultLedger::new();

    suite::run(&config, &mut ledger).await.unwrap();

    // Six basic cases, the persistent case, and one verdict per batch.
    assert_eq!(ledger.total(), 7 + config.load.client_counts.len());
    assert!(ledger.is_success(), "failures: {:?}", ledger.failures());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unreachable_server_aborts_before_any_case() {
    let mut config = HarnessConfig::default();
    config.server.port = vacant_port().await;
    config.timeouts.preflight_secs = 0.5;
    let mut ledger = ResultLedger::new();

    let err = suite::run(&config, &mut ledger).await.unwrap_err();

    assert!(matches!(err, HarnessError::UnreachableServer { .. }));
    assert_eq!(ledger.total(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failures_do_not_stop_sibling_cases() {
    let server = LineTestServer::start_with(Behavior::CorruptEcho("")).await;
    let config = server.config();
    let mut ledger = ResultLedger::new();

    suite::run(&config, &mut ledger).await.unwrap();

    // ECHO, persistent and both batches fail; the rest still ran and passed.
    assert_eq!(ledger.total(), 9);
    assert_eq!(ledger.failed(), 4);
    assert_eq!(ledger.passed(), 5);
    let failed: Vec<&str> = ledger.failures().iter().map(|f| f.test.as_str()).collect();
    assert_eq!(
        failed,
        [
            "ECHO command",
            "Persistent connection",
            "Concurrent connections",
            "Concurrent connections",
        ]
    );
}
