//! Parallel ECHO load from many simulated clients.
//!
//! Each client owns its connection and reports a structured outcome back
//! through a `JoinSet`. The only shared state is the success counter.

use crate::channel::Connector;
use linecheck_core::ledger::ResultLedger;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info};

/// How one simulated client finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutcome {
    Completed,
    Mismatch {
        command: String,
        expected: String,
        actual: String,
    },
    Failed(String),
    /// The client exceeded the wait bound and was cancelled.
    TimedOut,
}

impl fmt::Display for ClientOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOutcome::Completed => write!(f, "completed"),
            ClientOutcome::Mismatch {
                command,
                expected,
                actual,
            } => write!(f, "'{command}' expected '{expected}', got '{actual}'"),
            ClientOutcome::Failed(reason) => write!(f, "{reason}"),
            ClientOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Result of one batch, read after every client has reported.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub clients: usize,
    pub succeeded: usize,
    /// Indexed by client id.
    pub outcomes: Vec<ClientOutcome>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.succeeded == self.clients
    }

    /// `Only k/n clients succeeded`, followed by a count per failure kind.
    pub fn failure_reason(&self) -> String {
        let (mut mismatched, mut errored, mut timed_out) = (0, 0, 0);
        for outcome in &self.outcomes {
            match outcome {
                ClientOutcome::Completed => {}
                ClientOutcome::Mismatch { .. } => mismatched += 1,
                ClientOutcome::Failed(_) => errored += 1,
                ClientOutcome::TimedOut => timed_out += 1,
            }
        }

        let breakdown: Vec<String> = [
            (mismatched, "wrong response"),
            (errored, "connection error"),
            (timed_out, "timed out"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{count} {label}"))
        .collect();

        let mut reason = format!(
            "Only {}/{} clients succeeded",
            self.succeeded, self.clients
        );
        if !breakdown.is_empty() {
            reason.push_str(&format!(" ({})", breakdown.join(", ")));
        }
        reason
    }
}

/// Launch `clients` parallel clients, each sending `commands_per_client` ECHOs.
///
/// Every client is cancelled once `wait_bound` elapses; dropping its session
/// closes the socket. The counter is read only after all clients reported.
pub async fn run_batch(
    connector: &Connector,
    clients: usize,
    commands_per_client: usize,
    wait_bound: Duration,
) -> BatchReport {
    info!(clients, commands_per_client, "starting concurrency batch");

    let counter = Arc::new(Mutex::new(0usize));
    let mut tasks = JoinSet::new();

    for id in 0..clients {
        let connector = connector.clone();
        let counter = Arc::clone(&counter);
        tasks.spawn(async move {
            let session = client_session(&connector, id, commands_per_client);
            let outcome = match timeout(wait_bound, session).await {
                Ok(ClientOutcome::Completed) => {
                    *counter.lock().await += 1;
                    ClientOutcome::Completed
                }
                Ok(outcome) => outcome,
                Err(_) => ClientOutcome::TimedOut,
            };
            (id, outcome)
        });
    }

    let mut outcomes = vec![ClientOutcome::Failed("client task aborted".to_owned()); clients];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, outcome)) => {
                if outcome != ClientOutcome::Completed {
                    debug!(client = id, %outcome, "client did not complete");
                }
                outcomes[id] = outcome;
            }
            // The id is lost with the panic; its slot keeps the aborted placeholder.
            Err(e) => debug!("client task aborted: {}", e),
        }
    }

    let succeeded = *counter.lock().await;
    debug_assert!(succeeded <= clients);
    info!(clients, succeeded, "concurrency batch finished");

    BatchReport {
        clients,
        succeeded,
        outcomes,
    }
}

async fn client_session(connector: &Connector, id: usize, commands: usize) -> ClientOutcome {
    let mut channel = match connector.open().await {
        Ok(channel) => channel,
        Err(e) => return ClientOutcome::Failed(e.to_string()),
    };

    for seq in 0..commands {
        let message = format!("Client{id}_Msg{seq}");
        let command = format!("ECHO {message}");
        match channel.request(&command).await {
            Ok(response) if response == message => {}
            Ok(response) => {
                return ClientOutcome::Mismatch {
                    command,
                    expected: message,
                    actual: response,
                };
            }
            Err(e) => return ClientOutcome::Failed(e.to_string()),
        }
    }
    ClientOutcome::Completed
}

/// Run one batch and record a single verdict for it.
pub async fn record_batch(
    connector: &Connector,
    ledger: &mut ResultLedger,
    clients: usize,
    commands_per_client: usize,
    wait_bound: Duration,
) -> BatchReport {
    let report = run_batch(connector, clients, commands_per_client, wait_bound).await;
    if report.is_success() {
        ledger.record_pass(format!("Concurrent connections ({clients} clients)"));
    } else {
        ledger.record_fail("Concurrent connections", report.failure_reason());
    }
    report
}
