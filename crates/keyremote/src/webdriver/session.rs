//! A browser session bound to the player page.

use crate::{
    AppError, AppResult,
    config::{AccountConfig, Config, LayoutConfig},
    webdriver::{DriverProcess, WebDriverClient, protocol},
};

use std::{panic::Location, path::Path, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use keyremote_core::{ContextId, CoreError, CoreResult, ElementHandle, PageDriver, Selector};
use reqwest::Method;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

/// How long a spawned WebDriver server gets to come up.
const SERVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(15);

/// A live WebDriver session, owned by the control loop.
pub struct WebDriverSession {
    client: WebDriverClient,
    session_id: String,
    server: Option<DriverProcess>,
}

impl WebDriverSession {
    /// Start the browser, open the start page, and apply optional settings.
    ///
    /// # Errors
    ///
    /// Fails if the WebDriver server cannot be started or reached, or the
    /// session cannot be created or navigated. Extension install and login
    /// autofill failures are only logged.
    #[instrument(skip_all)]
    pub async fn launch(config: &Config) -> AppResult<Self> {
        let browser = &config.browser;

        let server = match &browser.driver_binary {
            Some(binary) => {
                let port = protocol::port(&browser.webdriver_url).ok_or_else(|| {
                    AppError::WebDriver {
                        reason: format!("No port in webdriver_url {}", browser.webdriver_url),
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;
                Some(DriverProcess::spawn(binary, port)?)
            }
            None => None,
        };

        let client = WebDriverClient::new(&browser.webdriver_url)?;
        client.wait_until_ready(SERVER_STARTUP_TIMEOUT).await?;

        let session_id = client
            .new_session(protocol::capabilities(browser))
            .await?;
        info!(session_id = %session_id, "Browser session started");

        let mut session = Self {
            client,
            session_id,
            server,
        };

        if let Err(e) = session.navigate(&browser.start_url).await {
            if let Err(release_error) = session.release().await {
                warn!(error = %release_error, "Failed to release session after startup error");
            }
            return Err(e.into());
        }

        if let Some(extension) = &browser.extension_path {
            match session.install_extension(extension).await {
                Ok(()) => info!(extension = ?extension, "Extension installed"),
                Err(e) => warn!(extension = ?extension, error = %e, "Extension install failed"),
            }
        }

        if let Err(e) = session.autofill_login(&config.account, &config.layout).await {
            warn!(error = %e, "Login autofill failed");
        }

        Ok(session)
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> CoreResult<Value> {
        self.client
            .command(method, &self.session_id, path, body)
            .await
    }

    async fn navigate(&self, url: &str) -> CoreResult<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        info!(url, "Navigated");
        Ok(())
    }

    async fn install_extension(&self, path: &Path) -> CoreResult<()> {
        let body = json!({ "path": path.to_string_lossy(), "temporary": true });
        self.command(Method::POST, "/moz/addon/install", Some(body))
            .await?;
        Ok(())
    }

    async fn type_into(&self, selector: &Selector, text: &str) -> CoreResult<()> {
        let Some(field) = self.find_controls(selector).await?.into_iter().next() else {
            return Err(CoreError::Driver {
                reason: format!("Login field {} not found", selector),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let element = format!("/element/{}", field.as_str());
        self.command(Method::POST, &format!("{element}/clear"), None)
            .await?;
        self.command(
            Method::POST,
            &format!("{element}/value"),
            Some(json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    /// Fill the login form when credentials are configured.
    ///
    /// The password is submitted with Enter only when both fields are set.
    async fn autofill_login(&self, account: &AccountConfig, layout: &LayoutConfig) -> CoreResult<()> {
        let Some(username) = &account.username else {
            return Ok(());
        };

        let username_field = Selector::from(&layout.login_username);
        self.type_into(&username_field, username).await?;

        if let Some(password) = &account.password {
            let password_field = Selector::from(&layout.login_password);
            let submit = format!("{}{}", password, protocol::ENTER_KEY);
            self.type_into(&password_field, &submit).await?;
        }

        info!("Login form filled");
        Ok(())
    }
}

#[async_trait]
impl PageDriver for WebDriverSession {
    async fn current_context(&self) -> CoreResult<ContextId> {
        let value = self.command(Method::GET, "/window", None).await?;
        value
            .as_str()
            .map(ContextId::new)
            .ok_or_else(|| CoreError::Driver {
                reason: format!("Unexpected window handle: {}", value),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn switch_context(&self, context: &ContextId) -> CoreResult<()> {
        self.command(
            Method::POST,
            "/window",
            Some(json!({ "handle": context.as_str() })),
        )
        .await?;
        Ok(())
    }

    async fn current_address(&self) -> CoreResult<String> {
        let value = self.command(Method::GET, "/url", None).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CoreError::Driver {
                reason: format!("Unexpected URL value: {}", value),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn find_controls(&self, selector: &Selector) -> CoreResult<Vec<ElementHandle>> {
        let value = self
            .command(Method::POST, "/elements", Some(protocol::locate(selector)))
            .await?;
        Ok(protocol::element_handles(&value))
    }

    async fn click(&self, handle: &ElementHandle) -> CoreResult<()> {
        let path = format!("/element/{}/click", handle.as_str());
        self.command(Method::POST, &path, None).await?;
        Ok(())
    }

    async fn drag_by(&self, handle: &ElementHandle, dx: i32, dy: i32) -> CoreResult<()> {
        self.command(
            Method::POST,
            "/actions",
            Some(protocol::drag_actions(handle, dx, dy)),
        )
        .await?;
        // Release any input state left behind by the sequence.
        self.command(Method::DELETE, "/actions", None).await?;
        Ok(())
    }

    async fn release(&mut self) -> CoreResult<()> {
        let result = self.command(Method::DELETE, "", None).await;
        if result.is_ok() {
            info!(session_id = %self.session_id, "Browser session closed");
        }

        if let Some(server) = &mut self.server {
            server.stop().await;
        }
        self.server = None;

        result.map(|_| ())
    }
}
