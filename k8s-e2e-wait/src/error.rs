use std::time::Duration;

use k8s_e2e_ext::PodStatusError;

use super::*;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The condition never converged. `last_observed` describes what the
    /// final tick saw, if anything.
    #[error(
        "timed out after {timeout:?} waiting for {condition}, last observed: {}",
        .last_observed.as_deref().unwrap_or("nothing")
    )]
    DeadlineExceeded {
        condition: String,
        timeout: Duration,
        last_observed: Option<String>,
    },
    #[error("cancelled while waiting for {condition}")]
    Cancelled { condition: String },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    PodStatus(#[from] PodStatusError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl Error {
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(err) if err.is_not_found())
    }

    /// Folds the outcome of a poll into the crate error, naming the
    /// condition that was awaited.
    pub(crate) fn from_poll(
        err: PollError<Self>,
        condition: impl ToString,
        last_observed: Option<String>,
    ) -> Self {
        match err {
            PollError::DeadlineExceeded { timeout, .. } => Self::DeadlineExceeded {
                condition: condition.to_string(),
                timeout,
                last_observed,
            },
            PollError::Cancelled { .. } => Self::Cancelled {
                condition: condition.to_string(),
            },
            PollError::Condition(err) => err,
        }
    }
}
