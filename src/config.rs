//! Server configuration
//!
//! Read from the command line, with environment variable fallbacks.

use clap::Parser;

use crate::compatibility::{MatchRules, DEFAULT_MIN_KINK_OVERLAP};

/// Default server address
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Interface used when only a port is given
pub const PORT_HOST: &str = "0.0.0.0";

/// Channel buffer size for server commands
pub const DEFAULT_COMMAND_BUFFER: usize = 256;

/// Channel buffer size for messages queued to one client
pub const DEFAULT_CLIENT_BUFFER: usize = 64;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Anonymous 1:1 pairing server")]
pub struct ServerConfig {
    /// Address to listen on (takes precedence over --port)
    #[arg(env = "BIND_ADDR")]
    pub addr: Option<String>,

    /// Port to listen on, on all interfaces
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Distinct kinks two clients must share to be paired
    #[arg(long, env = "MIN_KINK_OVERLAP", default_value_t = DEFAULT_MIN_KINK_OVERLAP)]
    pub min_kink_overlap: usize,

    /// Pending commands buffered for the pairing actor
    #[arg(long, default_value_t = DEFAULT_COMMAND_BUFFER)]
    pub command_buffer: usize,

    /// Pending messages buffered per client before delivery fails
    #[arg(long, default_value_t = DEFAULT_CLIENT_BUFFER)]
    pub client_buffer: usize,
}

impl ServerConfig {
    /// Resolve the listen address: explicit address, then port, then the default
    pub fn bind_addr(&self) -> String {
        match (&self.addr, self.port) {
            (Some(addr), _) => addr.clone(),
            (None, Some(port)) => format!("{}:{}", PORT_HOST, port),
            (None, None) => DEFAULT_ADDR.to_string(),
        }
    }

    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            min_kink_overlap: self.min_kink_overlap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["pairing_server"]).unwrap();
        assert_eq!(config.command_buffer, DEFAULT_COMMAND_BUFFER);
        assert_eq!(config.client_buffer, DEFAULT_CLIENT_BUFFER);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::try_parse_from([
            "pairing_server",
            "0.0.0.0:9000",
            "--min-kink-overlap",
            "3",
            "--client-buffer",
            "8",
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.match_rules(), MatchRules { min_kink_overlap: 3 });
        assert_eq!(config.client_buffer, 8);
    }

    #[test]
    fn test_port_listens_on_all_interfaces() {
        let config = ServerConfig::try_parse_from(["pairing_server", "--port", "8080"]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");

        let config =
            ServerConfig::try_parse_from(["pairing_server", "10.0.0.1:7000", "--port", "8080"])
                .unwrap();
        assert_eq!(config.bind_addr(), "10.0.0.1:7000");
    }
}
