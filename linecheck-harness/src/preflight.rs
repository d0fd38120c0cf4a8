//! Reachability gate run before any case.

use linecheck_core::error::{HarnessError, Result};
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Succeeds if a TCP connect to `addr` completes within `wait`.
///
/// No bytes are exchanged; the probe connection is dropped immediately.
pub async fn check_reachable(addr: &str, wait: Duration) -> Result<()> {
    let source = match timeout(wait, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => {
            debug!("preflight connect to {} succeeded", addr);
            return Ok(());
        }
        Ok(Err(e)) => e,
        Err(_) => io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connect timed out after {wait:?}"),
        ),
    };

    Err(HarnessError::UnreachableServer {
        addr: addr.to_owned(),
        source,
    })
}
