//! keyremote: control a browser-hosted media player with global hotkeys.

mod app;
mod config;
mod error;
mod hotkey_chord;
mod hotkey_listener;
mod ui_command;
mod webdriver;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    hotkey_listener::{HotkeyListener, HotkeyRegistration},
    ui_command::UiCommand,
};

use crate::config::Config;

use std::sync::{Arc, Mutex};

use keyremote_core::EventTracker;
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("keyremote=debug,keyremote_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let event_loop = EventLoopBuilder::<UiCommand>::with_user_event().build();
    let ui_proxy = event_loop.create_proxy();

    // Lives on the main thread: hotkey messages are delivered to the
    // registering thread. Dropping it unregisters the hotkeys.
    let mut hotkeys: Option<HotkeyRegistration> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                UiCommand::ReleaseHotkeys => {
                    if let Some(registration) = hotkeys.take() {
                        if let Err(e) = registration.unregister_all() {
                            error!(error = ?e, "Failed to unregister hotkeys");
                        }
                    }
                }
                UiCommand::Shutdown => {
                    info!("Exiting keyremote");
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let bindings = match config.bindings.table() {
                    Ok(b) => b,
                    Err(e) => {
                        error!("Invalid key bindings: {:?}", e);
                        std::process::exit(1);
                    }
                };

                for (command, shortcut) in bindings.iter() {
                    info!(command = %command, shortcut = %shortcut, "Key binding");
                }

                let teardown_proxy = Mutex::new(ui_proxy.clone());
                let tracker = Arc::new(EventTracker::with_exit_hook(move || {
                    if let Ok(proxy) = teardown_proxy.lock() {
                        let _ = proxy.send_event(UiCommand::ReleaseHotkeys);
                    }
                }));

                let registration = match HotkeyRegistration::register(&bindings) {
                    Ok(r) => r,
                    Err(e) => {
                        error!("Failed to register hotkeys: {:?}", e);
                        std::process::exit(1);
                    }
                };
                let listener = HotkeyListener::new(registration.commands(), Arc::clone(&tracker));
                hotkeys = Some(registration);

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let ui_proxy = ui_proxy.clone();

                // The browser session and control loop run on their own
                // runtime thread; the event loop keeps pumping hotkey messages.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let app = App {
                            config,
                            tracker,
                            listener,
                            ui_proxy,
                        };

                        if let Err(e) = app.run().await {
                            error!(error = ?e, "keyremote failed");
                            std::process::exit(1);
                        }
                    });
                });
            }
            _ => {}
        }
    });
}
