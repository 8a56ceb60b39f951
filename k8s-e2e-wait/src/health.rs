use std::time::Duration;

use reqwest::StatusCode;

use super::*;
use crate::waiter::LastObserved;
use crate::waiter::resolve;

impl<C> Waiter<C> {
    /// Waits until a GET of `url` answers with status 200.
    ///
    /// Unlike the cluster waits, a failing request (connection refused, DNS,
    /// request timeout) only means "not yet". On timeout the error reports
    /// the last response status or request failure.
    pub async fn wait_for_http_success(&self, url: &str, timeout: Duration) -> Result<()> {
        let last = LastObserved::default();
        let observed = &last;
        let http = &self.http;
        let outcome = self
            .poll(timeout, move || async move {
                match http.get(url).send().await {
                    Ok(response) if response.status() == StatusCode::OK => Ok::<_, Error>(true),
                    Ok(response) => {
                        let status = response.status();
                        tracing::debug!(url, %status, "Endpoint not healthy yet");
                        observed.record(format!("response {status}"));
                        Ok(false)
                    }
                    Err(err) => {
                        tracing::debug!(url, %err, "Endpoint unreachable");
                        observed.record(format!("no response ({err})"));
                        Ok(false)
                    }
                }
            })
            .await;
        let condition = format!("{url} to return a successful status code");
        resolve(outcome, condition, last)
    }
}
