//! One request line out, one response chunk back.
//!
//! Every operation is bounded by the connector's timeout. Nothing here
//! retries; a failed attempt is final for that call.

use linecheck_core::config::HarnessConfig;
use linecheck_core::error::{HarnessError, Result};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Opens channels to one server address with fixed limits.
#[derive(Debug, Clone)]
pub struct Connector {
    addr: String,
    timeout: Duration,
    buffer_size: usize,
}

impl Connector {
    pub fn new(addr: impl Into<String>, timeout: Duration, buffer_size: usize) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            buffer_size,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            config.address(),
            config.operation_timeout(),
            config.load.buffer_size,
        )
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connect and keep the connection open for several commands.
    pub async fn open(&self) -> Result<CommandChannel> {
        let stream = timeout(self.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| self.elapsed())?
            .map_err(HarnessError::connection)?;
        stream.set_nodelay(true).map_err(HarnessError::connection)?;

        Ok(CommandChannel {
            stream,
            buffer: vec![0; self.buffer_size],
            timeout: self.timeout,
        })
    }

    /// Send one command on a fresh connection and return the reply.
    ///
    /// Connect, write and read share a single deadline. The connection is
    /// closed when this returns, whether or not it succeeded.
    pub async fn send(&self, command: &str) -> Result<String> {
        timeout(self.timeout, async {
            let mut channel = self.open().await?;
            channel.exchange(command).await
        })
        .await
        .map_err(|_| self.elapsed())?
    }

    fn elapsed(&self) -> HarnessError {
        HarnessError::Connection(format!(
            "timed out after {:?} talking to {}",
            self.timeout(),
            self.addr()
        ))
    }
}

/// An open connection to the server under test.
///
/// Owned by exactly one task; dropping it closes the socket.
#[derive(Debug)]
pub struct CommandChannel {
    stream: TcpStream,
    buffer: Vec<u8>,
    timeout: Duration,
}

impl CommandChannel {
    /// Send `command` and wait for the next response chunk.
    pub async fn request(&mut self, command: &str) -> Result<String> {
        let limit = self.timeout;
        timeout(limit, self.exchange(command))
            .await
            .map_err(|_| HarnessError::Connection(format!("timed out after {limit:?}")))?
    }

    async fn exchange(&mut self, command: &str) -> Result<String> {
        let mut line = String::with_capacity(command.len() + 1);
        line.push_str(command);
        line.push('\n');

        self.stream
            .write_all(line.as_bytes())
            .await
            .map_err(HarnessError::connection)?;
        self.stream.flush().await.map_err(HarnessError::connection)?;

        let n = self
            .stream
            .read(&mut self.buffer)
            .await
            .map_err(HarnessError::connection)?;
        if n == 0 {
            return Err(HarnessError::Connection(
                "server closed the connection without replying".to_owned(),
            ));
        }

        let response = String::from_utf8_lossy(&self.buffer[..n])
            .trim_end()
            .to_owned();
        debug!("{} -> {}", command, response);
        Ok(response)
    }
}
