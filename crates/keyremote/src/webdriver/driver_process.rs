use crate::{AppError, AppResult};

use std::{panic::Location, path::Path, process::Stdio};

use error_location::ErrorLocation;
use tokio::process::{Child, Command};
use tracing::{info, instrument, warn};

/// A locally spawned WebDriver server (e.g. geckodriver).
///
/// Killed on [`stop`](Self::stop), or when dropped.
#[derive(Debug)]
pub struct DriverProcess {
    child: Child,
}

impl DriverProcess {
    /// Spawn `binary --port <port>`.
    #[track_caller]
    #[instrument]
    pub fn spawn(binary: &Path, port: u16) -> AppResult<Self> {
        let child = Command::new(binary)
            .arg("--port")
            .arg(port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::WebDriver {
                reason: format!("Failed to start {}: {}", binary.display(), e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(pid = ?child.id(), port, "WebDriver server started");

        Ok(Self { child })
    }

    /// Kill the server and reap it.
    pub async fn stop(&mut self) {
        match self.child.kill().await {
            Ok(()) => info!("WebDriver server stopped"),
            Err(e) => warn!(error = %e, "Failed to stop WebDriver server"),
        }
    }
}
