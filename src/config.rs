use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io;

use serde::Deserialize;
use thiserror::Error;

use crate::wake;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read host config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed host config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yml::Error,
    },
}

fn default_broadcast() -> String {
    wake::DEFAULT_BROADCAST.to_string()
}

fn default_port() -> u16 {
    wake::DEFAULT_PORT
}

/// A single wakeable host. Broadcast address and port fall back to the
/// protocol defaults when the entry leaves them out.
#[derive(Debug, Deserialize)]
pub struct HostEntry {
    pub mac: String,

    #[serde(default = "default_broadcast")]
    pub broadcast: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Optional host alias file, so targets can be addressed by name instead of
/// MAC address:
///
/// ```yaml
/// hosts:
///   office-pc:
///     mac: "00:CA:FE:BA:BE:00"
///     broadcast: "192.168.1.255"
///     port: 9
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub hosts: HashMap<String, HostEntry>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let expanded = shellexpand::tilde(path);
        let raw = fs::read_to_string(expanded.as_ref()).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    fn parse(raw: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(raw)
    }

    pub fn host(&self, alias: &str) -> Option<&HostEntry> {
        self.hosts.get(alias)
    }
}
