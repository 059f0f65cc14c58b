use crate::{AppResult, HotkeyListener, UiCommand, config::Config, webdriver::WebDriverSession};

use std::sync::Arc;

use keyremote_core::{ControlLoop, EventTracker};
use tao::event_loop::EventLoopProxy;
use tokio::sync::watch;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Main application state.
///
/// Runs on the async runtime thread. The hotkey registrations stay on the
/// main thread; only the tracker and the listener's id map cross over.
pub struct App {
    pub(crate) config: Config,
    pub(crate) tracker: Arc<EventTracker>,
    pub(crate) listener: HotkeyListener,
    pub(crate) ui_proxy: EventLoopProxy<UiCommand>,
}

impl App {
    /// Start the browser session and run until `Exit` is fired.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid or the browser session
    /// cannot be started.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<()> {
        let Self {
            config,
            tracker,
            listener,
            ui_proxy,
        } = self;

        let session_id = Uuid::new_v4();
        info!(session_id = %session_id, "keyremote starting");

        let layout = config.layout.control_layout()?;
        let settings = config.control.loop_settings();

        let driver = WebDriverSession::launch(&config).await?;
        let control_loop = ControlLoop::new(driver, Arc::clone(&tracker), layout, settings).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::join!(
            async {
                if let Err(e) = listener.run(shutdown_rx).await {
                    error!(error = ?e, "Hotkey listener error");
                }
            },
            async {
                control_loop.run().await;
                let _ = shutdown_tx.send(true);
            }
        );

        let _ = ui_proxy.send_event(UiCommand::Shutdown);
        info!(session_id = %session_id, "keyremote shut down successfully");

        Ok(())
    }
}
