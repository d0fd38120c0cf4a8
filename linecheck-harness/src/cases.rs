//! Fixed conformance checks for the command set.
//!
//! Each case records exactly one outcome in the ledger. Connection errors
//! are caught here and turned into failures; nothing propagates upward.

use crate::channel::Connector;
use linecheck_core::ledger::ResultLedger;

pub const ECHO_MESSAGE: &str = "Hello, World!";
pub const UNKNOWN_COMMAND: &str = "INVALID_COMMAND";

/// Sent in order on one connection, with the substring each reply must contain.
pub const PERSISTENT_SEQUENCE: [(&str, &str); 3] = [
    ("PING", "PONG"),
    ("ECHO Test123", "Test123"),
    ("STATS", "Active clients:"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Ping,
    Time,
    Echo,
    Stats,
    Quit,
    UnknownCommand,
    PersistentConnection,
}

impl Case {
    /// Single-command checks, in run order.
    pub const BASIC: [Case; 6] = [
        Case::Ping,
        Case::Time,
        Case::Echo,
        Case::Stats,
        Case::Quit,
        Case::UnknownCommand,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Case::Ping => "PING command",
            Case::Time => "TIME command",
            Case::Echo => "ECHO command",
            Case::Stats => "STATS command",
            Case::Quit => "QUIT command",
            Case::UnknownCommand => "Unknown command handling",
            Case::PersistentConnection => "Persistent connection (multiple commands)",
        }
    }

    fn failure_name(self) -> &'static str {
        match self {
            Case::PersistentConnection => "Persistent connection",
            other => other.name(),
        }
    }

    /// Run the check and record its single outcome.
    pub async fn run(self, connector: &Connector, ledger: &mut ResultLedger) {
        match self.execute(connector).await {
            Ok(()) => ledger.record_pass(self.name()),
            Err(reason) => ledger.record_fail(self.failure_name(), reason),
        }
    }

    /// The single command this case sends, or `None` for multi-command cases.
    pub fn command(self) -> Option<String> {
        match self {
            Case::Ping => Some("PING".to_owned()),
            Case::Time => Some("TIME".to_owned()),
            Case::Echo => Some(format!("ECHO {ECHO_MESSAGE}")),
            Case::Stats => Some("STATS".to_owned()),
            Case::Quit => Some("QUIT".to_owned()),
            Case::UnknownCommand => Some(UNKNOWN_COMMAND.to_owned()),
            Case::PersistentConnection => None,
        }
    }

    async fn execute(self, connector: &Connector) -> Result<(), String> {
        let Some(command) = self.command() else {
            return persistent_connection(connector).await;
        };
        let response = connector
            .send(&command)
            .await
            .map_err(|e| e.to_string())?;
        self.check(&response)
    }

    /// Validate a reply against this case's contract.
    pub fn check(self, response: &str) -> Result<(), String> {
        let failure = match self {
            Case::Ping if response != "PONG" => format!("Expected 'PONG', got '{response}'"),
            Case::Time
                if response.is_empty() || !response.contains('-') || !response.contains(':') =>
            {
                format!("Invalid time format: '{response}'")
            }
            Case::Echo if response != ECHO_MESSAGE => {
                format!("Expected '{ECHO_MESSAGE}', got '{response}'")
            }
            Case::Stats if !response.contains("Active clients:") => {
                format!("Invalid stats format: '{response}'")
            }
            Case::Quit if !response.contains("Goodbye") => {
                format!("Expected 'Goodbye', got '{response}'")
            }
            Case::UnknownCommand
                if !(response.contains("ERROR") || response.contains("Unknown")) =>
            {
                format!("Expected error, got '{response}'")
            }
            _ => return Ok(()),
        };
        Err(failure)
    }
}

async fn persistent_connection(connector: &Connector) -> Result<(), String> {
    let mut channel = connector.open().await.map_err(|e| e.to_string())?;

    for (command, expected) in PERSISTENT_SEQUENCE {
        let response = channel.request(command).await.map_err(|e| e.to_string())?;
        if !response.contains(expected) {
            return Err(format!(
                "Command responses incorrect: expected '{expected}' for '{command}', got '{response}'"
            ));
        }
    }
    Ok(())
}
