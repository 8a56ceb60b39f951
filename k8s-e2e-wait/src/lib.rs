//! Convergence waits for Kubernetes end-to-end tests.
//!
//! [`poll_until`] is a fixed interval, timeout bounded retry loop. [`Waiter`]
//! layers the cluster conditions on top of it: pods ready, pods running an
//! image, a resource being gone and an HTTP endpoint answering 200.

pub use tokio_util::sync::CancellationToken;

pub use client::BoxError;
pub use client::ClientError;
pub use client::PodLister;
pub use client::ResourceGetter;
pub use config::ConfigError;
pub use config::HTTP_REQUEST_TIMEOUT_ENV;
pub use config::POLL_INTERVAL_ENV;
pub use config::PollConfig;
pub use config::ROLLOUT_TIMEOUT_ENV;
pub use error::Error;
pub use error::Result;
pub use poll::PollError;
pub use poll::poll_until;
pub use poll::poll_until_cancelled;
pub use waiter::Waiter;

pub mod condition;

mod client;
mod config;
mod error;
mod gone;
mod health;
mod pods;
mod poll;
mod waiter;

#[cfg(test)]
mod testing;
