//! Full run: preflight, conformance cases, then concurrency batches.

use crate::cases;
use crate::channel::Connector;
use crate::concurrency;
use crate::preflight;
use linecheck_core::config::HarnessConfig;
use linecheck_core::error::Result;
use linecheck_core::ledger::ResultLedger;
use tracing::info;

/// Run every check against the configured server.
///
/// Only an unreachable server is returned as an error, and in that case
/// nothing has been recorded. Every other failure lands in `ledger`.
pub async fn run(config: &HarnessConfig, ledger: &mut ResultLedger) -> Result<()> {
    let addr = config.address();
    preflight::check_reachable(&addr, config.preflight_timeout()).await?;
    info!("server reachable at {}", addr);
    ledger.note(&format!("\n✓ Server is running on {addr}\n"));

    let connector = Connector::from_config(config);

    ledger.section("Testing Basic Commands:");
    for case in cases::Case::BASIC {
        case.run(&connector, ledger).await;
    }

    ledger.section("Testing Connection Handling:");
    cases::Case::PersistentConnection.run(&connector, ledger).await;
    for &clients in &config.load.client_counts {
        concurrency::record_batch(
            &connector,
            ledger,
            clients,
            config.load.commands_per_client,
            config.client_wait_bound(),
        )
        .await;
    }

    Ok(())
}
