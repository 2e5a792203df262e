//! Command-line configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

/// Runtime options for the slot-swap server.
#[derive(Debug, Clone, Parser)]
#[command(name = "slot-swap", about = "Calendar slot-swap backend")]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to bind the HTTP listener to.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// The socket address the listener binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
