use std::cell::Cell;
use std::io;

use super::*;

const INTERVAL: Duration = Duration::from_secs(1);
const TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test(start_paused = true)]
async fn done_on_first_tick_does_not_wait() {
    let started = Instant::now();
    let result = poll_until(INTERVAL, TIMEOUT, || async { Ok::<_, io::Error>(true) }).await;

    assert!(result.is_ok());
    assert!(started.elapsed() < INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn never_done_times_out_within_one_interval_of_timeout() {
    let started = Instant::now();
    let result = poll_until(INTERVAL, TIMEOUT, || async { Ok::<_, io::Error>(false) }).await;
    let elapsed = started.elapsed();

    let err = result.unwrap_err();
    assert!(err.is_deadline_exceeded(), "{err:?}");
    assert!(elapsed >= TIMEOUT, "{elapsed:?}");
    assert!(elapsed <= TIMEOUT + INTERVAL, "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn ticks_at_fixed_interval() {
    let calls = Cell::new(0);
    let result = poll_until(INTERVAL, Duration::from_millis(3500), || {
        calls.set(calls.get() + 1);
        async { Ok::<_, io::Error>(false) }
    })
    .await;

    // t = 0, 1, 2, 3 and a final evaluation at the 3.5s deadline
    assert!(matches!(
        result,
        Err(PollError::DeadlineExceeded { ticks: 5, .. })
    ));
    assert_eq!(calls.get(), 5);
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_evaluates_once() {
    let calls = Cell::new(0);
    let result = poll_until(INTERVAL, Duration::ZERO, || {
        calls.set(calls.get() + 1);
        async { Ok::<_, io::Error>(false) }
    })
    .await;

    assert!(matches!(
        result,
        Err(PollError::DeadlineExceeded { ticks: 1, .. })
    ));
    assert_eq!(calls.get(), 1);

    let result = poll_until(INTERVAL, Duration::ZERO, || async { Ok::<_, io::Error>(true) }).await;
    assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn condition_error_stops_immediately() {
    let calls = Cell::new(0);
    let started = Instant::now();
    let result = poll_until(INTERVAL, TIMEOUT, || {
        calls.set(calls.get() + 1);
        let tick = calls.get();
        async move {
            if tick == 3 {
                Err(io::Error::other("apiserver unavailable"))
            } else {
                Ok(false)
            }
        }
    })
    .await;

    match result {
        Err(PollError::Condition(err)) => assert_eq!(err.to_string(), "apiserver unavailable"),
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(calls.get(), 3);
    assert_eq!(started.elapsed(), 2 * INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn success_at_deadline_beats_timeout() {
    // The only evaluation finishes after the deadline has already passed
    let result = poll_until(INTERVAL, Duration::from_millis(500), || async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok::<_, io::Error>(true)
    })
    .await;

    assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_sleep_is_not_a_timeout() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = poll_until_cancelled(INTERVAL, TIMEOUT, &cancel, || async {
        Ok::<_, io::Error>(false)
    })
    .await;

    let err = result.unwrap_err();
    assert!(err.is_cancelled(), "{err:?}");
    assert!(!err.is_deadline_exceeded());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_slow_evaluation() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = poll_until_cancelled(INTERVAL, TIMEOUT, &cancel, || async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok::<_, io::Error>(true)
    })
    .await;

    assert!(matches!(result, Err(PollError::Cancelled { ticks: 1 })));
}

#[tokio::test]
async fn already_cancelled_token_skips_evaluation() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let calls = Cell::new(0);

    let result = poll_until_cancelled(INTERVAL, TIMEOUT, &cancel, || {
        calls.set(calls.get() + 1);
        async { Ok::<_, io::Error>(true) }
    })
    .await;

    assert!(matches!(result, Err(PollError::Cancelled { ticks: 0 })));
    assert_eq!(calls.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn unbounded_timeout_does_not_overflow() {
    let result = poll_until(INTERVAL, Duration::MAX, || async { Ok::<_, io::Error>(true) }).await;
    assert!(result.is_ok());

    let calls = Cell::new(0);
    let result = poll_until(INTERVAL, Duration::MAX, || {
        calls.set(calls.get() + 1);
        let tick = calls.get();
        async move { Ok::<_, io::Error>(tick == 3) }
    })
    .await;
    assert!(result.is_ok());
    assert_eq!(calls.get(), 3);
}

#[tokio::test(start_paused = true)]
async fn unbounded_interval_still_honors_timeout() {
    let started = Instant::now();
    let result = poll_until(Duration::MAX, TIMEOUT, || async { Ok::<_, io::Error>(false) }).await;

    assert!(matches!(
        result,
        Err(PollError::DeadlineExceeded { ticks: 2, .. })
    ));
    assert!(started.elapsed() >= TIMEOUT);
    assert!(started.elapsed() < TIMEOUT + INTERVAL);
}
