use std::env;
use std::time::Duration;

use constcat::concat;
use time::ext::NumericalStdDuration as _;

const ENV_PREFIX: &str = "K8S_E2E_";

pub const POLL_INTERVAL_ENV: &str = concat!(ENV_PREFIX, "POLL_INTERVAL");
pub const ROLLOUT_TIMEOUT_ENV: &str = concat!(ENV_PREFIX, "ROLLOUT_TIMEOUT");
pub const HTTP_REQUEST_TIMEOUT_ENV: &str = concat!(ENV_PREFIX, "HTTP_REQUEST_TIMEOUT");

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid duration: {reason}")]
    InvalidDuration {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    #[error("HTTP request timeout must be greater than zero")]
    ZeroHttpRequestTimeout,
}

/// Timing knobs shared by every wait of a [`Waiter`](crate::Waiter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two evaluations of a condition. Defaults to 1s.
    pub interval: Duration,
    /// Upper bound for image rollouts. Defaults to 5m.
    pub rollout_timeout: Duration,
    /// Per request timeout of the endpoint health check. Defaults to 10s.
    pub http_request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: 1.std_seconds(),
            rollout_timeout: 5.std_minutes(),
            http_request_timeout: 10.std_seconds(),
        }
    }
}

impl PollConfig {
    /// Builds a config from the defaults, overridden by `K8S_E2E_*`
    /// environment variables holding Go style durations such as `500ms` or
    /// `2m30s`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let duration = |var: &'static str, default: Duration| {
            lookup(var).map_or(Ok(default), |value| parse_duration(var, value))
        };
        let config = Self {
            interval: duration(POLL_INTERVAL_ENV, defaults.interval)?,
            rollout_timeout: duration(ROLLOUT_TIMEOUT_ENV, defaults.rollout_timeout)?,
            http_request_timeout: duration(
                HTTP_REQUEST_TIMEOUT_ENV,
                defaults.http_request_timeout,
            )?,
        };
        config.validate()
    }

    pub fn with_interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    pub fn with_rollout_timeout(self, rollout_timeout: Duration) -> Self {
        Self {
            rollout_timeout,
            ..self
        }
    }

    pub fn with_http_request_timeout(self, http_request_timeout: Duration) -> Self {
        Self {
            http_request_timeout,
            ..self
        }
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.interval.is_zero() {
            Err(ConfigError::ZeroInterval)
        } else if self.http_request_timeout.is_zero() {
            Err(ConfigError::ZeroHttpRequestTimeout)
        } else {
            Ok(self)
        }
    }
}

fn parse_duration(var: &'static str, value: String) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDuration {
        var,
        value: value.clone(),
        reason,
    };
    let nanos = go_parse_duration::parse_duration(value.trim())
        .map_err(|err| invalid(format!("{err:?}")))?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| invalid("negative durations are not allowed".to_string()))
}
