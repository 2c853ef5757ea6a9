use anyhow::Error;
use clap::Parser;
use config::Config;
use log::LevelFilter;
use movies_db::PgStore;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::net::TcpListener;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Movie ratings web service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file, defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

fn load_config(args: &Args) -> Result<Config, Error> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut config = config.apply_env();
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let config = load_config(&args)?;

    let level = LevelFilter::from_str(&config.logging.level).unwrap_or(LevelFilter::Info);
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    log::info!("Starting movie-ratings {}", VERSION);

    let store = PgStore::connect(&config.database);
    if config.database.create_schema {
        if let Err(e) = store.ensure_schema() {
            log::warn!("Couldn't create the movies table: {:#}", e);
        }
    }

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address).await?;
    log::info!("Listening on {}{}", address, api::API_PREFIX);

    axum::serve(listener, api::app(store)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_config_file() -> Result<(), Error> {
        let args = Args::parse_from([
            "movie-ratings",
            "--config",
            "config/example.toml",
            "--port",
            "9001",
        ]);

        let config = load_config(&args)?;
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.logging.level, "debug");

        Ok(())
    }
}
