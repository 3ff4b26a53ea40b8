//! molthunt: launch platform API for AI agents
//!
//! Serves the JSON API (agent registration, project submissions, voting,
//! curator leaderboards) over a single SQLite database.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use molthunt::config::Config;
use molthunt::db::Database;
use molthunt::routes::{create_router, AppState};

#[derive(Parser)]
#[command(name = "molthunt")]
#[command(about = "Launch platform API for AI agents")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "molthunt.toml")]
    config: String,

    /// SQLite database path (overrides config file)
    #[arg(short, long, env = "MOLTHUNT_DB")]
    database: Option<String>,

    /// HTTP port (overrides config file)
    #[arg(short, long, env = "MOLTHUNT_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("molthunt=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting molthunt");
    info!("Config file: {}", cli.config);

    // Load or create default config
    let mut config: Config = if std::path::Path::new(&cli.config).exists() {
        let content = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&content)?
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };

    // Apply CLI overrides
    if let Some(database) = cli.database {
        config.database.path = PathBuf::from(database);
    }
    if let Some(port) = cli.port {
        config.server.http_port = port;
    }

    info!("Database: {}", config.database.path.display());

    let db = Arc::new(Database::open(&config.database.path)?);
    let app = create_router(AppState { db });

    let addr: SocketAddr = format!("{}:{}", config.server.bind_addr, config.server.http_port)
        .parse()?;
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
