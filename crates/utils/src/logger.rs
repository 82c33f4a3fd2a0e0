use env_logger::Builder;
use log::LevelFilter;

pub fn init_logger(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", log_level);
            LevelFilter::Info
        }
    };

    // RUST_LOG overrides still apply, so operators can raise verbosity per module
    Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}
