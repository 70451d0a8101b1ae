// Signal handling module (nginx-style)
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGUSR1: Reopen log files
// - SIGUSR2: Toggle access logging

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::config::AppState;
use crate::logger;

/// Signal handler state
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Arc<Notify>,
    /// Whether shutdown has been requested
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Record the request and wake the accept loop
    pub fn request_shutdown(&self, reason: &str) {
        logger::log_info(&format!("{reason} received, initiating graceful shutdown"));
        self.shutdown_requested.store(true, Ordering::SeqCst);
        // notify_one stores a permit if the loop is not waiting yet
        self.shutdown.notify_one();
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Flip access logging and return the new setting
pub fn toggle_access_log(state: &AppState) -> bool {
    let enabled = !state.access_log_enabled.fetch_xor(true, Ordering::SeqCst);
    logger::log_info(&format!(
        "Access logging {}",
        if enabled { "enabled" } else { "disabled" }
    ));
    enabled
}

/// Start signal handlers (Unix only)
///
/// | Signal  | Action              | Nginx Equivalent  |
/// |---------|---------------------|-------------------|
/// | SIGTERM | Graceful stop       | `nginx -s quit`   |
/// | SIGINT  | Graceful stop       | Ctrl+C            |
/// | SIGUSR1 | Reopen log files    | `nginx -s reopen` |
/// | SIGUSR2 | Toggle access log   | -                 |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>, state: Arc<AppState>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let registered = (|| {
            Ok::<_, std::io::Error>((
                signal(SignalKind::terminate())?,
                signal(SignalKind::interrupt())?,
                signal(SignalKind::user_defined1())?,
                signal(SignalKind::user_defined2())?,
            ))
        })();
        let (mut sigterm, mut sigint, mut sigusr1, mut sigusr2) = match registered {
            Ok(signals) => signals,
            Err(e) => {
                logger::log_error(&format!("Failed to register signal handlers: {e}"));
                return;
            }
        };

        logger::log_info(&format!(
            "Signal handlers registered (pid {}): TERM/INT stop, USR1 reopen logs, USR2 toggle access log",
            std::process::id()
        ));

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    handler.request_shutdown("SIGTERM");
                    break;
                }
                _ = sigint.recv() => {
                    handler.request_shutdown("SIGINT");
                    break;
                }
                _ = sigusr1.recv() => {
                    logger::log_info("SIGUSR1 received, reopening log files");
                    logger::reopen();
                }
                _ = sigusr2.recv() => {
                    toggle_access_log(&state);
                }
            }
        }
    });
}

/// Fallback for other platforms - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>, _state: Arc<AppState>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            handler.request_shutdown("Ctrl+C");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SiteOptions};
    use crate::handler::Pipeline;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_shutdown_permit_is_kept() {
        let handler = SignalHandler::new();
        handler.request_shutdown("test");
        assert!(handler.shutdown_requested.load(Ordering::SeqCst));
        // Notified after the fact still completes
        handler.shutdown.notified().await;
    }

    #[test]
    fn test_toggle_access_log() {
        let config = Config::load_from("__missing_test_config__").unwrap();
        let pipeline = Pipeline::new(SiteOptions::default(), Arc::new(MemoryStore::new()));
        let state = AppState::new(&config, pipeline);
        let initial = state.access_log_enabled.load(Ordering::SeqCst);

        assert_eq!(toggle_access_log(&state), !initial);
        assert_eq!(toggle_access_log(&state), initial);
    }
}
