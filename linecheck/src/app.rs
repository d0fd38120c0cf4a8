use linecheck_core::config::HarnessConfig;
use linecheck_core::error::HarnessError;
use linecheck_core::ledger::ResultLedger;
use linecheck_harness::{Connector, suite};
use tracing::error;

/// Run the whole suite and print the report. Returns overall success.
pub async fn run(config: &HarnessConfig) -> bool {
    let rule = "=".repeat(60);
    println!("{rule}");
    println!("TCP Server Test Suite");
    println!("{rule}");

    let mut ledger = ResultLedger::with_progress();
    match suite::run(config, &mut ledger).await {
        Ok(()) => {}
        Err(HarnessError::UnreachableServer { addr, source }) => {
            error!("preflight failed: {}", source);
            println!("\n✗ Error: Server is not running on {addr}");
            println!("Please start the server before running tests.");
            return false;
        }
        Err(e) => {
            error!("run aborted: {}", e);
            return false;
        }
    }

    println!("\n{ledger}");
    ledger.is_success()
}

/// One round-trip on a fresh connection, reply printed to stdout.
pub async fn send(config: &HarnessConfig, line: &str) -> bool {
    match Connector::from_config(config).send(line).await {
        Ok(response) => {
            println!("{response}");
            true
        }
        Err(e) => {
            eprintln!("{e}");
            false
        }
    }
}
