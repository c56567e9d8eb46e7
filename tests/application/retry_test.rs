use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use velohub_audio::application::services::with_retry;

#[tokio::test(start_paused = true)]
async fn given_two_failures_then_success_when_retrying_then_returns_value_after_backoff() {
    let attempts = AtomicU32::new(0);
    let started = tokio::time::Instant::now();

    let result: Result<u32, &str> = with_retry(
        || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient")
                } else {
                    Ok(42)
                }
            }
        },
        3,
        Duration::from_millis(1000),
    )
    .await;

    assert_eq!(result, Ok(42));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    // 1000 ms after the first failure, 2000 ms after the second.
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn given_persistent_failure_when_retrying_then_rethrows_last_error() {
    let attempts = AtomicU32::new(0);

    let result: Result<u32, String> = with_retry(
        || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("failure {}", n)) }
        },
        3,
        Duration::from_millis(1000),
    )
    .await;

    assert_eq!(result, Err("failure 2".to_string()));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn given_immediate_success_when_retrying_then_does_not_sleep() {
    let started = tokio::time::Instant::now();

    let result: Result<u32, &str> =
        with_retry(|| async { Ok(7) }, 3, Duration::from_millis(1000)).await;

    assert_eq!(result, Ok(7));
    assert_eq!(started.elapsed(), Duration::ZERO);
}
