// Shutdown module
// Waits for in-flight connections after the listener is closed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::logger;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait until no connection is active or `grace` has elapsed.
///
/// Returns the number of connections still open when it gave up.
pub async fn drain_connections(conn_counter: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let active = conn_counter.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_info("All connections closed");
            return 0;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Grace period of {}s elapsed with {active} connection(s) still open",
                grace.as_secs()
            ));
            return active;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_drain_idle() {
        let counter = AtomicUsize::new(0);
        assert_eq!(drain_connections(&counter, Duration::from_secs(1)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_waits_for_close() {
        let counter = Arc::new(AtomicUsize::new(1));
        let closer = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            closer.fetch_sub(1, Ordering::SeqCst);
        });
        assert_eq!(drain_connections(&counter, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up() {
        let counter = AtomicUsize::new(2);
        assert_eq!(drain_connections(&counter, Duration::from_millis(10)).await, 2);
    }
}
