use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries a fallible fetch with doubling delays between attempts.
///
/// The operation runs once plus up to `retries` more times; the wait starts
/// at `initial_delay_ms` and doubles after every failure. The last error is
/// returned when all attempts are spent.
pub async fn with_retry<F, Fut, T, E>(
    mut operation: F,
    retries: usize,
    initial_delay_ms: u64,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Error: From<E>,
{
    let attempts = retries + 1;
    let mut delay_ms = initial_delay_ms;

    for attempt in 1..attempts {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                let err = Error::from(err);
                debug!(
                    "Attempt {}/{} failed: {}. Retrying in {}ms",
                    attempt, attempts, err, delay_ms
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms *= 2;
            }
        }
    }

    operation().await.map_err(Error::from)
}
