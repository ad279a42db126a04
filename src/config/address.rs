// ABOUTME: Listen address for the HTTP server.
// ABOUTME: Parses "host:port" and the Go-style ":port" shorthand.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Address the API server binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddress {
    host: String,
    port: u16,
}

impl ListenAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("listen address cannot be empty".to_string());
        }

        // rsplit keeps bracketed IPv6 hosts intact: "[::1]:9090".
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("listen address must include a port: {}", s))?;

        let port = port
            .parse::<u16>()
            .map_err(|_| format!("invalid port in listen address: {}", s))?;

        let host = match host {
            "" => "0.0.0.0",
            h => h.trim_start_matches('[').trim_end_matches(']'),
        };

        Ok(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for ListenAddress {
    fn default() -> Self {
        Self::new("0.0.0.0", 9090)
    }
}

impl FromStr for ListenAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl<'de> Deserialize<'de> for ListenAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
