//! escape-key-listener: background listener for Escape and modifier keys
//!
//! Installs a CGEventTap, feeds every key event into a
//! `KeyboardEventManager` and logs Escape presses and modifier changes.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use escape_key_listener::config::Config;
use escape_key_listener::keyboard::{KeyCode, KeyboardEventManager, Modifier, ESC_CODE};
use escape_key_listener::lifecycle::ShutdownSignal;
use escape_key_listener::{KeyEvent, KeyListener};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "escape-key-listener starting"
    );
    debug!(?config, "configuration loaded");

    let manager = Arc::new(KeyboardEventManager::new());
    register_observers(&manager, &config);

    let shutdown = ShutdownSignal::new();

    // Key listener -> manager
    let (key_tx, key_rx) = mpsc::channel(config.channel_capacity);
    let listener = KeyListener::new(key_tx, config.listener_options());

    match listener.start() {
        Ok(()) => {
            info!("key listener started");
        }
        Err(e) => {
            error!(?e, "failed to start key listener");
            warn!("continuing without key input - check Accessibility permissions");
        }
    }

    tokio::select! {
        _ = Arc::clone(&manager).run(key_rx) => {
            info!("keyboard event manager exited");
        }

        result = shutdown.wait() => {
            match result {
                Ok(reason) => info!(%reason, "shutdown signal received"),
                Err(e) => error!(?e, "signal handling failed"),
            }
        }
    }

    info!("shutting down...");
    listener.stop();
    info!("escape-key-listener stopped");

    Ok(())
}

fn register_observers(manager: &KeyboardEventManager, config: &Config) {
    manager.add_observer(ESC_CODE, |pressed: bool| {
        if pressed {
            info!("escape pressed");
        } else {
            debug!("escape released");
        }
    });

    for modifier in Modifier::ALL {
        manager.add_observer(modifier.code(), move |pressed: bool| {
            debug!(%modifier, pressed, "modifier key");
        });
    }

    if config.echo_events {
        let codes = std::iter::once(ESC_CODE).chain(Modifier::ALL.iter().map(|m| m.code()));
        for code in codes {
            manager.add_observer(code, move |pressed: bool| echo(code, pressed));
        }
    }
}

fn echo(key_code: KeyCode, pressed: bool) {
    match serde_json::to_string(&KeyEvent::new(key_code, pressed)) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!(?e, "failed to encode key event"),
    }
}
