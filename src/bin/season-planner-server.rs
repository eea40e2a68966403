// ABOUTME: Season Planner HTTP server binary
// ABOUTME: Loads configuration, opens the database, and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! # Season Planner Server
//!
//! ```bash
//! export AUTH_PROVIDER_URL=https://project.auth.example.com
//! export AUTH_JWT_SECRET=...
//! season-planner-server --http-port 8080 --database-url sqlite:./data/season_planner.db
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use season_planner::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    resources::ServerResources,
    server,
};
use std::sync::Arc;
use tracing::{error, info};

/// Command-line arguments; each overrides its environment variable
#[derive(Parser, Debug)]
#[command(name = "season-planner-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Season Planner - training plan management API")]
struct Args {
    /// HTTP port (overrides `HTTP_PORT`)
    #[arg(long)]
    http_port: Option<u16>,

    /// Database URL (overrides `DATABASE_URL`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.http_port {
        config.http_port = port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database = DatabaseUrl::parse_url(url);
    }

    logging::init_from_env()?;
    info!("Configuration loaded: {}", config.summary());

    if let DatabaseUrl::SQLite { path } = &config.database {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let database = Database::new(&config.database.to_connection_string())
        .await
        .context("Failed to open database")?;
    info!(
        "Database ready: {}",
        if config.database.is_memory() {
            "in-memory"
        } else {
            "sqlite file"
        }
    );

    let resources = Arc::new(ServerResources::new(database, config));
    if let Err(e) = server::run(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
