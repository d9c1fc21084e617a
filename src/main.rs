//! Transit API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                TRANSIT GATEWAY               │
//!                       │                                              │
//!   Client Request      │  ┌────────┐    ┌────────────┐                │
//!   ────────────────────┼─▶│  http  │───▶│  dispatch  │                │
//!                       │  │ server │    │ validation │                │
//!                       │  └────────┘    └─────┬──────┘                │
//!                       │                      │                       │
//!                       │                      ▼                       │
//!                       │               ┌─────────────┐  1. POST login │
//!                       │               │  upstream   │───────────────┼──▶ Transit
//!                       │               │  session +  │  2. GET query  │     API
//!                       │               │  client     │───────────────┼──▶
//!                       │               └─────┬───────┘                │
//!                       │                     │                        │
//!   Client Response     │  ┌──────────┐       │                        │
//!   ◀───────────────────┼──│ response │◀──────┘                        │
//!                       │  │ CORS+JSON│                                │
//!                       │  └──────────┘                                │
//!                       │                                              │
//!                       │   config · observability · lifecycle         │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use transit_gateway::config::load_config;
use transit_gateway::observability::{logging, metrics};
use transit_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "transit-gateway")]
#[command(about = "CORS-friendly gateway for the SPTrans Olho Vivo API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "TRANSIT_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("transit-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let _signal_task = shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
