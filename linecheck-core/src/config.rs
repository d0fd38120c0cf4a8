use crate::error::{HarnessError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Bound on one connect + write + read round-trip, in seconds.
    #[serde(default = "default_operation_secs")]
    pub operation_secs: f64,
    #[serde(default = "default_preflight_secs")]
    pub preflight_secs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadConfig {
    /// One concurrency batch is run per entry, in order.
    #[serde(default = "default_client_counts")]
    pub client_counts: Vec<usize>,
    #[serde(default = "default_commands_per_client")]
    pub commands_per_client: usize,
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            operation_secs: default_operation_secs(),
            preflight_secs: default_preflight_secs(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            client_counts: default_client_counts(),
            commands_per_client: default_commands_per_client(),
            buffer_size: default_buffer_size(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_operation_secs() -> f64 {
    5.0
}

const fn default_preflight_secs() -> f64 {
    2.0
}

fn default_client_counts() -> Vec<usize> {
    vec![10, 20]
}

const fn default_commands_per_client() -> usize {
    5
}

const fn default_buffer_size() -> usize {
    4096
}

impl HarnessConfig {
    pub fn load_from_path<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| HarnessError::Config(format!("Failed to read config: {}", e)))?;

        let config: HarnessConfig = toml::from_str(&content)
            .map_err(|e| HarnessError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Falls back to built-in defaults when no config file is installed.
    pub fn load_or_default() -> Result<Self> {
        match Self::find_config_file() {
            Ok(path) => Self::load_from_path(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    fn find_config_file() -> Result<Utf8PathBuf> {
        let candidates = [
            dirs::config_dir()
                .map(|p| p.join("linecheck/linecheck.toml"))
                .and_then(|p| Utf8PathBuf::try_from(p).ok()),
            Some(Utf8PathBuf::from("/etc/linecheck/linecheck.toml")),
        ];

        for candidate in candidates.into_iter().flatten() {
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(HarnessError::Config("Config file not found".to_owned()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(HarnessError::Config("server.host must not be empty".to_owned()));
        }
        if self.server.port == 0 {
            return Err(HarnessError::Config("server.port must not be 0".to_owned()));
        }
        for (name, secs) in [
            ("timeouts.operation_secs", self.timeouts.operation_secs),
            ("timeouts.preflight_secs", self.timeouts.preflight_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(HarnessError::Config(format!(
                    "{name} must be a positive number of seconds, got {secs}"
                )));
            }
            Duration::try_from_secs_f64(secs).map_err(|e| {
                HarnessError::Config(format!("{name} is out of range ({secs}): {e}"))
            })?;
        }
        if self.operation_timeout().checked_mul(2).is_none() {
            return Err(HarnessError::Config(format!(
                "timeouts.operation_secs is too large to derive the client wait bound, got {}",
                self.timeouts.operation_secs
            )));
        }
        if self.load.commands_per_client == 0 {
            return Err(HarnessError::Config(
                "load.commands_per_client must be at least 1".to_owned(),
            ));
        }
        if self.load.buffer_size == 0 {
            return Err(HarnessError::Config("load.buffer_size must be at least 1".to_owned()));
        }
        if self.load.client_counts.contains(&0) {
            return Err(HarnessError::Config(
                "load.client_counts must not contain 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeouts.operation_secs)
    }

    pub fn preflight_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeouts.preflight_secs)
    }

    /// How long the batch coordinator waits on a single simulated client.
    pub fn client_wait_bound(&self) -> Duration {
        self.operation_timeout() * 2
    }
}
