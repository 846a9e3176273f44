//! Network binding and graceful-shutdown timing (§4.J).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Where the server binds, and how long it waits for in-flight requests
/// and background tasks to drain before a forced exit.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct NetConfig {
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    #[serde(default = "default_port")]
    pub port: u16,

    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value_t = DEFAULT_SHUTDOWN_TIMEOUT_SECS)]
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}
fn default_port() -> u16 {
    8080
}
fn default_shutdown_timeout() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

impl NetConfig {
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.host {
            IpAddr::V4(addr) => addr.is_unspecified(),
            IpAddr::V6(addr) => addr.is_unspecified(),
        }
    }
}

impl Default for NetConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = NetConfig::default();
        assert_eq!(config.socket_addr(), SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080));
    }

    #[test]
    fn default_does_not_bind_all_interfaces() {
        assert!(!NetConfig::default().binds_to_all_interfaces());
    }
}
