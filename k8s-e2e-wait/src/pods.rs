use std::time::Duration;

use super::*;
use crate::waiter::LastObserved;
use crate::waiter::resolve;

impl<C: PodLister> Waiter<C> {
    /// Waits until exactly `expected_replicas` pods matching `selector` are
    /// running with every container passing its readiness check.
    ///
    /// The match is exact, so pods of a previous generation that are still
    /// around keep the wait from converging. Failing to list the pods, or a
    /// pod whose status cannot be classified, ends the wait immediately.
    pub async fn wait_for_pods_ready(
        &self,
        namespace: &str,
        selector: &str,
        expected_replicas: usize,
        timeout: Duration,
    ) -> Result<()> {
        let last = LastObserved::default();
        let observed = &last;
        let client = &self.client;
        let outcome = self
            .poll(timeout, move || async move {
                let pods = client.list_pods(namespace, selector).await?;
                let ready = condition::running_and_ready(&pods)?;
                tracing::debug!(
                    namespace,
                    selector,
                    ready,
                    expected_replicas,
                    total = pods.len(),
                    "Polled pods for readiness"
                );
                observed.record(format!("{ready} of {} pods running and ready", pods.len()));
                Ok::<_, Error>(ready == expected_replicas)
            })
            .await;
        let condition =
            format!("{expected_replicas} ready pods matching {selector:?} in namespace {namespace}");
        resolve(outcome, condition, last)
    }

    /// Waits until exactly `expected_replicas` pods matching `selector` run a
    /// container whose image is exactly `image`.
    ///
    /// Bounded by [`PollConfig::rollout_timeout`].
    pub async fn wait_for_pods_run_image(
        &self,
        namespace: &str,
        selector: &str,
        expected_replicas: usize,
        image: &str,
    ) -> Result<()> {
        let last = LastObserved::default();
        let observed = &last;
        let client = &self.client;
        let outcome = self
            .poll(self.config.rollout_timeout, move || async move {
                let pods = client.list_pods(namespace, selector).await?;
                let running = condition::running_image(&pods, image);
                tracing::debug!(
                    namespace,
                    selector,
                    image,
                    running,
                    expected_replicas,
                    "Polled pods for image"
                );
                observed.record(format!("{running} of {} pods running {image}", pods.len()));
                Ok::<_, Error>(running == expected_replicas)
            })
            .await;
        let condition = format!(
            "{expected_replicas} pods matching {selector:?} in namespace {namespace} to run {image}"
        );
        resolve(outcome, condition, last)
    }
}
