use std::future::Future;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use super::*;

/// Runs convergence waits against a cluster client `C`.
///
/// Every wait owns its own clock and shares nothing with other waits besides
/// the client, so one `Waiter` can drive several waits concurrently. All
/// waits stop with [`Error::Cancelled`] once the waiter's cancellation token
/// fires.
#[derive(Clone, Debug)]
pub struct Waiter<C> {
    pub(crate) client: C,
    pub(crate) config: PollConfig,
    pub(crate) http: reqwest::Client,
    cancel: CancellationToken,
}

impl<C> Waiter<C> {
    /// Create a `Waiter` with the default [`PollConfig`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = ();
    /// let waiter = k8s_e2e_wait::Waiter::new(client)?;
    /// waiter
    ///     .wait_for_http_success("http://localhost:9090/-/ready", std::time::Duration::from_secs(60))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(client: C) -> Result<Self> {
        Self::with_config(client, PollConfig::default())
    }

    pub fn with_config(client: C, config: PollConfig) -> Result<Self> {
        let config = config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.http_request_timeout)
            .build()?;
        let cancel = CancellationToken::new();
        Ok(Self {
            client,
            config,
            http,
            cancel,
        })
    }

    /// Bind the waits of this waiter to an externally owned token.
    pub fn with_cancellation(self, cancel: CancellationToken) -> Self {
        Self { cancel, ..self }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub(crate) async fn poll<F, Fut>(
        &self,
        timeout: Duration,
        condition: F,
    ) -> Result<(), PollError<Error>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        poll_until_cancelled(self.config.interval, timeout, &self.cancel, condition).await
    }
}

/// What the most recent tick of a wait saw, reported if the wait times out.
#[derive(Debug, Default)]
pub(crate) struct LastObserved(Mutex<Option<String>>);

impl LastObserved {
    pub(crate) fn record(&self, observed: impl ToString) {
        let mut last = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *last = Some(observed.to_string());
    }

    fn into_inner(self) -> Option<String> {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn resolve(
    outcome: Result<(), PollError<Error>>,
    condition: String,
    observed: LastObserved,
) -> Result<()> {
    match outcome {
        Ok(()) => {
            tracing::info!(%condition, "Condition met");
            Ok(())
        }
        Err(err) => {
            let err = Error::from_poll(err, &condition, observed.into_inner());
            tracing::warn!(%condition, %err, "Wait failed");
            Err(err)
        }
    }
}
