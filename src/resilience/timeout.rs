//! # Deadline Helper
//!
//! Races an operation against a timer. The operation runs as its own tokio
//! task, so on timeout the caller moves on immediately while the task keeps
//! running detached; its result is discarded (any side effects, such as a
//! cache fill, still land).

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Await `operation` for at most `limit`.
///
/// Returns `None` when the deadline fires first or when the operation panics.
/// `label` names the step in logs.
pub async fn with_timeout<F, T>(label: &str, limit: Duration, operation: F) -> Option<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(operation);

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(join_error)) => {
            warn!(step = label, error = %join_error, "Operation aborted before completing");
            None
        }
        Err(_) => {
            debug!(
                step = label,
                limit_ms = limit.as_millis() as u64,
                "Deadline reached, continuing without result"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_never_resolving_operation_returns_none_at_deadline() {
        let started = Instant::now();
        let result: Option<()> =
            with_timeout("pending", Duration::from_millis(100), std::future::pending()).await;

        assert!(result.is_none());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(110));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_returns_value() {
        let result = with_timeout("fast", Duration::from_millis(100), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            "cloudy"
        })
        .await;
        assert_eq!(result, Some("cloudy"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_operation_keeps_running() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let result = with_timeout("slow", Duration::from_millis(50), async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
        })
        .await;
        assert!(result.is_none());
        assert!(!finished.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_operation_is_absent() {
        let result: Option<u32> = with_timeout("panics", Duration::from_secs(1), async {
            panic!("provider bug");
        })
        .await;
        assert!(result.is_none());
    }
}
