use crate::auth::AuthGate;
use crate::config::Config;
use crate::error::config::ConfigError;
use crate::error::server::ServerError;
use crate::server::{ActionServer, build_router};

use common::ErrorLocation;

use std::future::Future;
use std::net::SocketAddr;
use std::panic::Location;

use log::{info, warn};
use tokio::net::TcpListener;
use tokio::spawn as TokioSpawn;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to a running HTTP server.
///
/// The server runs in a background task until either the shutdown future
/// given to [`start_action_server`] resolves or [`shutdown`](Self::shutdown)
/// is called. Dropping the handle leaves the server running; only the
/// external future can stop it after that.
pub struct ActionServerHandle {
    local_addr: SocketAddr,
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ActionServerHandle {
    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-progress requests.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        self.wait().await
    }

    /// Wait until the server exits.
    pub async fn wait(self) -> Result<(), ServerError> {
        self.task.await.map_err(|e| ServerError::Serve {
            message: format!("Server task failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?
    }
}

/// Bind the configured address and serve `server` in a background task.
///
/// The auth gate and request timeout come from `config`. Only `listen`,
/// `auth` and `request_timeout_ms` are read; menus are whatever `server`
/// currently holds.
///
/// # Errors
///
/// - [`ServerError::Bind`] if the address is invalid or cannot be bound
pub async fn start_action_server<F>(
    server: ActionServer,
    config: &Config,
    shutdown: F,
) -> Result<ActionServerHandle, ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = config.listen_addr().await.map_err(|e: ConfigError| ServerError::Bind {
        address: config.listen.clone(),
        location: ErrorLocation::from(Location::caller()),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
    })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| ServerError::Bind {
            address: address.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

    let local_addr = listener.local_addr().map_err(|e| ServerError::Bind {
        address: address.to_string(),
        location: ErrorLocation::from(Location::caller()),
        source: e,
    })?;

    let auth = AuthGate::from_config(&config.auth);
    if auth.is_some() {
        info!("Basic auth enabled");
    } else {
        warn!("Basic auth disabled: anyone who can reach {local_addr} can run actions");
    }

    let router = build_router(server, auth, config.request_timeout());
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    info!("Listening on {local_addr}");

    let task = TokioSpawn(async move {
        let signal = async move {
            tokio::select! {
                _ = shutdown => {}
                Ok(()) = stop_rx => {}
            }
            info!("Shutting down HTTP server");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Serve {
                message: format!("HTTP server failed: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
    });

    Ok(ActionServerHandle {
        local_addr,
        stop_tx: Some(stop_tx),
        task,
    })
}
