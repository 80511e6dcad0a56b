use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation with a fixed backoff schedule.
///
/// The operation runs once, then once more after each delay in `delays_secs`
/// for as long as it keeps failing. An empty schedule means a single attempt.
///
/// # Returns
/// The first successful result, or the error of the final attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, delays_secs: &[u64]) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let total_attempts = delays_secs.len() + 1;
    let mut result = operation().await;

    for (i, delay_secs) in delays_secs.iter().enumerate() {
        if result.is_ok() {
            return result;
        }
        if let Err(e) = &result {
            warn!(
                "Request failed (attempt {}/{total_attempts}): {e}. Retrying after {delay_secs}s...",
                i + 1
            );
        }
        sleep(Duration::from_secs(*delay_secs)).await;
        result = operation().await;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays outcomes in order and counts how many were consumed.
    struct Outcomes(Mutex<VecDeque<Result<&'static str, &'static str>>>);

    impl Outcomes {
        fn new(outcomes: impl IntoIterator<Item = Result<&'static str, &'static str>>) -> Self {
            Self(Mutex::new(outcomes.into_iter().collect()))
        }

        #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
        fn next(&self) -> std::future::Ready<Result<&'static str, &'static str>> {
            std::future::ready(
                self.0
                    .lock()
                    .expect("outcomes lock poisoned")
                    .pop_front()
                    .unwrap_or(Err("script exhausted")),
            )
        }

        #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
        fn remaining(&self) -> usize {
            self.0.lock().expect("outcomes lock poisoned").len()
        }
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retrying() {
        let outcomes = Outcomes::new([Ok("reply"), Err("unused")]);

        let result = retry_with_backoff(|| outcomes.next(), &[0, 0]).await;

        assert_eq!(result, Ok("reply"));
        assert_eq!(outcomes.remaining(), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let outcomes = Outcomes::new([Err("timeout"), Err("502"), Ok("reply")]);

        let result = retry_with_backoff(|| outcomes.next(), &[0, 0, 0]).await;

        assert_eq!(result, Ok("reply"));
        assert_eq!(outcomes.remaining(), 0);
    }

    #[tokio::test]
    async fn last_error_wins_once_schedule_is_exhausted() {
        let outcomes = Outcomes::new([Err("timeout"), Err("502"), Err("429"), Ok("late")]);

        let result = retry_with_backoff(|| outcomes.next(), &[0, 0]).await;

        assert_eq!(result, Err("429"));
        assert_eq!(outcomes.remaining(), 1);
    }

    #[tokio::test]
    async fn empty_schedule_means_one_attempt() {
        let outcomes = Outcomes::new([Err("timeout"), Ok("reply")]);

        let result = retry_with_backoff(|| outcomes.next(), &[]).await;

        assert_eq!(result, Err("timeout"));
        assert_eq!(outcomes.remaining(), 1);
    }
}
