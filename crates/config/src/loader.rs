use std::fs;

use crate::config::Config;

pub fn read_config(filename: &str) -> Result<Config, String> {
    let text = fs::read_to_string(filename)
        .map_err(|err| format!("Failed to read config file '{}': {}", filename, err))?;

    let mut config: Config = serde_yaml::from_str(&text)
        .map_err(|err| format!("Could not parse YAML file '{}': {}", filename, err))?;

    config.normalize();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn reads_yaml_and_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "listen:\n  port: 9090\nupstreams:\n  - http://127.0.0.1:9001/\n  - http://127.0.0.1:9002\n"
        )
        .unwrap();

        let config = read_config(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.listen.port, 9090);
        assert_eq!(config.listen.address, "0.0.0.0");
        assert_eq!(
            config.upstreams,
            vec!["http://127.0.0.1:9001", "http://127.0.0.1:9002"]
        );
        assert_eq!(config.proxy.upstream_timeout_ms, 30_000);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_config("/definitely/not/here.yaml").unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "upstreams: [unterminated").unwrap();

        let err = read_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("Could not parse YAML file"));
    }
}
