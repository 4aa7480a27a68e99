// Server configuration

use crate::config::StaticConfig;
use anyhow::{bail, Result};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum number of concurrent clients
    pub max_clients: usize,
    /// Redis-style log level (debug, verbose, notice, warning, nothing)
    pub loglevel: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 6379,
            max_clients: 10000,
            loglevel: "notice".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay the directives of a config file on the defaults.
    /// Unknown directives are ignored with a warning.
    pub fn from_static(file: &StaticConfig) -> Result<Self> {
        let mut config = Self::default();

        for (name, args) in file.directives() {
            match name {
                "bind" => {
                    let Some(first) = args.first() else {
                        bail!("'bind' needs at least one address");
                    };
                    if args.len() > 1 {
                        warn!("only the first bind address is used: {}", first);
                    }
                    config.bind = first.clone();
                }
                "port" => {
                    let port = file.get_int("port")?.unwrap_or_default();
                    config.port = u16::try_from(port)
                        .map_err(|_| anyhow::anyhow!("port {} out of range", port))?;
                }
                "maxclients" => {
                    let max = file.get_int("maxclients")?.unwrap_or_default();
                    if max < 1 {
                        bail!("maxclients must be at least 1, got {}", max);
                    }
                    config.max_clients = max as usize;
                }
                "loglevel" => {
                    let level = file.get_string("loglevel").unwrap_or_default();
                    match level.to_ascii_lowercase().as_str() {
                        "debug" | "verbose" | "notice" | "warning" | "nothing" => {
                            config.loglevel = level
                        }
                        _ => bail!("invalid loglevel '{}'", level),
                    }
                }
                other => warn!("ignoring unsupported config directive '{}'", other),
            }
        }

        Ok(config)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_bind(mut self, bind: String) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }

    pub fn addr(&self) -> String {
        if self.bind.contains(':') {
            format!("[{}]:{}", self.bind, self.port)
        } else {
            format!("{}:{}", self.bind, self.port)
        }
    }
}
