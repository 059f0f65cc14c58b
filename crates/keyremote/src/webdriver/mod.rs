//! W3C WebDriver backend for the control core's [`PageDriver`].
//!
//! [`PageDriver`]: keyremote_core::PageDriver

mod client;
mod driver_process;
pub(crate) mod protocol;
mod session;

pub(crate) use {client::WebDriverClient, driver_process::DriverProcess, session::WebDriverSession};
