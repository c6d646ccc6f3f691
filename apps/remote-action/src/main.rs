use remote_action::cli::Args;
use remote_action::error::AppError;
use remote_action::logger::initialize as LoggerInitialize;

use action_core::config::Config;
use action_core::{ActionServer, start_action_server};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::exit;

use clap::Parser;
use log::{LevelFilter, error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        // The logger may be the thing that failed
        if log::max_level() == LevelFilter::Off {
            eprintln!("{e}");
        } else {
            error!("{e}");
        }
        exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    if let Some(log_dir) = &args.log_dir {
        create_dir_all(log_dir).map_err(|e| AppError::Startup {
            message: format!("Failed to create log directory {}: {e}", log_dir.display()),
            location: ErrorLocation::from(Location::caller()),
        })?;
    }

    // Initialize logger FIRST
    LoggerInitialize(args.log_dir.as_deref(), args.log_level)?;

    info!("remote-action {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(log_dir) = &args.log_dir {
        info!("Log directory: {}", log_dir.display());
    }

    let mut config = Config::load(&args.config)?;
    args.apply_overrides(&mut config)?;

    let server = ActionServer::new(&config)?;
    let handle = start_action_server(server, &config, shutdown_signal()).await?;

    info!("remote-action ready on {}", handle.local_addr());
    handle.wait().await?;

    info!("remote-action stopped");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
