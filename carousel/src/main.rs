//! Round-robin HTTP dispatcher - main entry point.
//!
//! TODO: Implement graceful shutdown signal handling (drain in-flight
//! requests on SIGTERM instead of dropping them)

use clap::Parser;
use log::error;

use carousel_config::config::Config;
use carousel_config::validator::validate as validate_config;
use carousel_edge::HttpListener;

#[derive(Parser)]
#[command(version, about = "Round-robin HTTP reverse proxy", long_about = None)]
struct Cli {
    /// Upstream base URLs, in rotation order (e.g. http://10.0.0.2:9000)
    targets: Vec<String>,

    // Sets a custom config file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Read the configuration file when one is given, otherwise start from
    // defaults and take everything from the command line
    let mut config = match cli.config {
        Some(path) => match carousel_config::loader::read_config(&path) {
            Ok(cfg) => cfg,
            Err(err_msg) => {
                eprintln!("Error loading config: {}", err_msg);
                std::process::exit(1);
            }
        },
        None => Config::from_targets(Vec::new()),
    };

    // The command line wins over the file
    if !cli.targets.is_empty() {
        config.upstreams = cli.targets;
    }
    if let Some(port) = cli.port {
        config.listen.port = port;
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    config.normalize();

    // Initialize the logger
    carousel_utils::logger::init_logger(&config.log.level);

    // Validate configuration before binding anything
    if !validate_config(&config) {
        error!("Configuration validation failed. Exiting...");
        std::process::exit(1);
    }

    let listener = match HttpListener::bind(&config).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(
                "Failed to bind {}:{}: {}",
                config.listen.address, config.listen.port, err
            );
            std::process::exit(1);
        }
    };

    listener.run().await;
}
