use crate::config::{Listen, Log, Proxy};

// default values
pub fn get_default_address() -> String {
    String::from("0.0.0.0")
}

pub fn get_default_port() -> u16 {
    8080
}

pub fn get_default_upstream_timeout_ms() -> u64 {
    30_000
}

pub fn get_default_log_level() -> String {
    String::from("info")
}

pub fn get_default_listen() -> Listen {
    Listen {
        address: get_default_address(),
        port: get_default_port(),
    }
}

pub fn get_default_proxy() -> Proxy {
    Proxy {
        upstream_timeout_ms: get_default_upstream_timeout_ms(),
    }
}

pub fn get_default_log() -> Log {
    Log {
        level: get_default_log_level(),
    }
}
