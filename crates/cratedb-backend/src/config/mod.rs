//! Connection settings and validation.

use serde::{Deserialize, Serialize};

use crate::error::{BackendError, Result};

/// Raw database settings as the host ORM hands them over.
///
/// CrateDB clients connect to a list of servers, not a single host/port
/// pair; the legacy `host`/`port` options are rejected so misconfigured
/// deployments fail at setup instead of at the first statement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// CrateDB server URLs, e.g. `["https://db1:4200", "https://db2:4200"]`.
    #[serde(default)]
    pub servers: Vec<String>,

    /// Legacy single-host option. Not allowed.
    #[serde(default)]
    pub host: Option<String>,

    /// Legacy port option. Not allowed.
    #[serde(default)]
    pub port: Option<u16>,
}

impl ConnectionSettings {
    /// Settings pointing at the given servers.
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
            host: None,
            port: None,
        }
    }

    /// Validate and produce the parameters for the underlying client.
    pub fn connection_params(&self) -> Result<ConnectionParams> {
        if self.host.is_some() || self.port.is_some() {
            return Err(BackendError::config(
                "Do not use 'HOST' or 'PORT' in the database settings, use 'SERVERS'",
            ));
        }
        if self.servers.is_empty() {
            return Err(BackendError::config(
                "'SERVERS' must list at least one CrateDB server",
            ));
        }
        Ok(ConnectionParams {
            servers: self.servers.clone(),
        })
    }
}

/// Validated parameters for the underlying client driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// CrateDB server URLs.
    pub servers: Vec<String>,
}
