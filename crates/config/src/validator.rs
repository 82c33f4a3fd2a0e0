use http::Uri;
use log::{error, info};

use crate::config::Config;

pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

pub fn validate(config: &Config) -> bool {
    info!("Starting configuration validation...");

    // --- Validate log level ---
    if !VALID_LOG_LEVELS
        .iter()
        .any(|lvl| lvl.eq_ignore_ascii_case(&config.log.level))
    {
        error!("Invalid log level: {}", config.log.level);
        return false;
    }

    // --- Validate listen address ---
    if config.listen.address.is_empty() {
        error!("Listen address is empty");
        return false;
    }

    // --- Validate upstream targets ---
    if config.upstreams.is_empty() {
        error!("No upstream targets configured (rotation over zero targets is undefined)");
        return false;
    }

    for target in &config.upstreams {
        if !valid_target(target) {
            return false;
        }
    }

    // --- Validate upstream timeout ---
    if config.proxy.upstream_timeout_ms == 0 {
        error!("Upstream timeout is invalid (0)");
        return false;
    }

    info!("Configuration validation passed successfully");

    true
}

fn valid_target(target: &str) -> bool {
    let uri: Uri = match target.parse() {
        Ok(uri) => uri,
        Err(err) => {
            error!("Invalid upstream target '{}': {}", target, err);
            return false;
        }
    };

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            error!(
                "Unsupported scheme '{}' for upstream target '{}' (only plain http upstreams are supported)",
                other, target
            );
            return false;
        }
        None => {
            error!(
                "Upstream target '{}' must be an absolute URL like http://10.0.0.2:9000",
                target
            );
            return false;
        }
    }

    let authority = match uri.authority() {
        Some(authority) => authority,
        None => {
            error!("Upstream target '{}' has no host", target);
            return false;
        }
    };

    if authority.as_str().contains('@') {
        error!("Upstream target '{}' must not carry userinfo", target);
        return false;
    }

    // the path of every forwarded request comes from the caller, so a base
    // URL carrying its own path or query would be silently ignored
    if !uri.path().is_empty() && uri.path() != "/" {
        error!("Upstream target '{}' must not carry a path", target);
        return false;
    }

    if uri.query().is_some() {
        error!("Upstream target '{}' must not carry a query", target);
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn config_with(targets: &[&str]) -> Config {
        Config::from_targets(targets.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn accepts_plain_http_targets() {
        let config = config_with(&["http://127.0.0.1:9001", "http://10.0.0.2:9000"]);
        assert!(validate(&config));
    }

    #[test]
    fn rejects_empty_target_list() {
        assert!(!validate(&config_with(&[])));
    }

    #[test]
    fn rejects_https_targets() {
        assert!(!validate(&config_with(&["https://127.0.0.1:9001"])));
    }

    #[test]
    fn rejects_bare_host_port() {
        assert!(!validate(&config_with(&["127.0.0.1:9001"])));
    }

    #[test]
    fn rejects_target_with_path() {
        assert!(!validate(&config_with(&["http://127.0.0.1:9001/api"])));
    }

    #[test]
    fn rejects_target_with_userinfo() {
        assert!(!validate(&config_with(&["http://user@127.0.0.1:9001"])));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = config_with(&["http://127.0.0.1:9001"]);
        config.proxy.upstream_timeout_ms = 0;
        assert!(!validate(&config));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = config_with(&["http://127.0.0.1:9001"]);
        config.log.level = String::from("loud");
        assert!(!validate(&config));
    }

    #[test]
    fn accepts_normalized_trailing_slash_target() {
        let mut config = config_with(&["http://127.0.0.1:9001/"]);
        config.normalize();
        assert!(validate(&config));
    }
}
