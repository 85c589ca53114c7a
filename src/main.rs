use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::LevelFilter;

use pixcast::config::{self, Config};
use pixcast::fetch::ImageFetcher;
use pixcast::server::Server;

/// Parse and validate a listen port (1-65535)
fn parse_port(s: &str) -> Result<u16, String> {
    let port: u16 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid port", s))?;
    if port == 0 {
        return Err("Port must be between 1 and 65535".to_string());
    }
    Ok(port)
}

/// Parse a log level name (off, error, warn, info, debug, trace)
fn parse_log_level(s: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(s).map_err(|_| {
        format!(
            "Unknown log level '{}'. Available levels: off, error, warn, info, debug, trace",
            s
        )
    })
}

/// pixcast: image-to-terminal rendering service
#[derive(Parser, Debug)]
#[command(name = "pixcast")]
#[command(version, about = "Serve remote images as terminal text grids over TCP")]
#[command(after_help = "EXAMPLES:
    # Listen on the default port (5173)
    pixcast

    # Listen on localhost only, with verbose logs
    pixcast --bind 127.0.0.1 --log-level debug

    # Then, from any terminal:
    nc localhost 5173")]
struct Cli {
    /// Config file path (default: <config dir>/pixcast/config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long, short, value_parser = parse_port)]
    port: Option<u16>,

    /// Log level (overrides RUST_LOG)
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<LevelFilter>,
}

/// Load .env file (if any) and install the logger.
///
/// Does not override existing environment variables. RUST_LOG is honored
/// unless --log-level was given; the default filter is `info`.
fn init_logging(level: Option<LevelFilter>) {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

/// Resolve the effective configuration.
///
/// Precedence: CLI flag > config file > built-in default. An explicit
/// --config path must exist; a missing default file is not an error.
fn load_config(cli: &Cli) -> Result<Config, config::ConfigError> {
    let mut cfg = match cli.config {
        Some(ref path) => Config::load_from_explicit(path)?,
        None => Config::load()?,
    };

    if let Some(ref bind) = cli.bind {
        cfg.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }

    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let cfg = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let fetcher = match ImageFetcher::from_config(&cfg.fetch) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: failed to create HTTP client: {}", e);
            process::exit(1);
        }
    };

    log::info!("Binding: {}", cfg.server.listen_addr());
    let server = match Server::bind(&cfg.server, fetcher).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        eprintln!("\nReceived Ctrl+C, shutting down...");
    };

    if let Err(e) = server.run_until(shutdown).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
