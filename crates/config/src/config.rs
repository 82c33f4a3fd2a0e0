use serde::{Deserialize, Serialize};

use crate::default::{
    get_default_address, get_default_listen, get_default_log, get_default_log_level,
    get_default_port, get_default_proxy, get_default_upstream_timeout_ms,
};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "get_default_listen")]
    pub listen: Listen,

    // ordered: position defines the rotation sequence
    #[serde(default)]
    pub upstreams: Vec<String>,

    #[serde(default = "get_default_proxy")]
    pub proxy: Proxy,

    #[serde(default = "get_default_log")]
    pub log: Log,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Listen {
    #[serde(default = "get_default_address")]
    pub address: String, // "0.0.0.0"

    #[serde(default = "get_default_port")]
    pub port: u16, // 8080; 0 binds an ephemeral port
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Proxy {
    // upper bound on waiting for the upstream response head
    #[serde(default = "get_default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Log {
    #[serde(default = "get_default_log_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error", "off"
}

impl Config {
    /// Config carrying `targets` with every other setting at its default.
    /// This is the argv path: `carousel http://10.0.0.2:9000 ...`.
    pub fn from_targets(targets: Vec<String>) -> Self {
        Self {
            listen: get_default_listen(),
            upstreams: targets,
            proxy: get_default_proxy(),
            log: get_default_log(),
        }
    }

    /// Trim whitespace and trailing slashes off the upstream targets so
    /// `http://host:9000/` and `http://host:9000` rotate as the same base URL.
    pub fn normalize(&mut self) {
        for target in &mut self.upstreams {
            let trimmed = target.trim().trim_end_matches('/');
            if trimmed.len() != target.len() {
                *target = trimmed.to_string();
            }
        }
    }
}
