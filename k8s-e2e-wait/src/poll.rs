use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// Stand-in for "never" when an instant would overflow.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Terminal failure of a poll that did not converge.
#[derive(Debug, thiserror::Error)]
pub enum PollError<E> {
    /// The condition never reported done before the timeout elapsed.
    #[error("timed out after {timeout:?} ({ticks} ticks)")]
    DeadlineExceeded { timeout: Duration, ticks: u64 },
    #[error("cancelled after {ticks} ticks")]
    Cancelled { ticks: u64 },
    /// The condition itself failed; the error is passed through unchanged.
    #[error(transparent)]
    Condition(E),
}

impl<E> PollError<E> {
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Evaluates `condition` immediately and then once per `interval` until it
/// returns `Ok(true)`, returns an error, or `timeout` has elapsed.
///
/// The deadline is only checked between evaluations, so an evaluation that
/// reports done after the deadline has passed still counts as success. A
/// zero `timeout` evaluates the condition exactly once.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// use std::time::Duration;
///
/// let result = k8s_e2e_wait::poll_until(
///     Duration::from_secs(1),
///     Duration::from_secs(30),
///     || async { Ok::<_, std::io::Error>(true) },
/// )
/// .await;
/// assert!(result.is_ok());
/// # }
/// ```
pub async fn poll_until<F, Fut, E>(
    interval: Duration,
    timeout: Duration,
    condition: F,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let cancel = CancellationToken::new();
    poll_until_cancelled(interval, timeout, &cancel, condition).await
}

/// Same as [`poll_until`], but stops with [`PollError::Cancelled`] as soon as
/// `cancel` fires, either during the interval sleep or while an evaluation is
/// in flight.
pub async fn poll_until_cancelled<F, Fut, E>(
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
    mut condition: F,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let started = Instant::now();
    let deadline = after(started, timeout);
    let mut ticks = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled { ticks });
        }

        ticks += 1;
        let done = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(PollError::Cancelled { ticks }),
            done = condition() => done.map_err(PollError::Condition)?,
        };

        if done {
            tracing::trace!(ticks, elapsed = ?started.elapsed(), "Condition met");
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(PollError::DeadlineExceeded { timeout, ticks });
        }

        let next = after(now, interval).min(deadline);
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(PollError::Cancelled { ticks }),
            () = tokio::time::sleep_until(next) => {}
        }
    }
}

fn after(instant: Instant, duration: Duration) -> Instant {
    instant
        .checked_add(duration)
        .unwrap_or_else(|| instant + FAR_FUTURE)
}

#[cfg(test)]
mod tests;
