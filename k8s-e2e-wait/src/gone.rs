use std::time::Duration;

use k8s_e2e_ext::appsv1;
use k8s_e2e_ext::openapi;

use super::*;
use crate::waiter::LastObserved;
use crate::waiter::resolve;

impl<C> Waiter<C> {
    /// Waits until getting `namespace/name` fails with "not found".
    ///
    /// Absence is only inferred from that specific signal; any other failure
    /// of the get ends the wait immediately.
    pub async fn wait_until_gone<K>(
        &self,
        namespace: &str,
        name: &str,
        timeout: Duration,
    ) -> Result<()>
    where
        C: ResourceGetter<K>,
        K: openapi::Resource,
    {
        let last = LastObserved::default();
        let observed = &last;
        let client = &self.client;
        let outcome = self
            .poll(timeout, move || async move {
                match ResourceGetter::<K>::get_resource(client, namespace, name).await {
                    Ok(_) => {
                        tracing::debug!(namespace, name, kind = K::KIND, "Resource still present");
                        observed.record(format!("{} {namespace}/{name} still present", K::KIND));
                        Ok(false)
                    }
                    Err(err) if err.is_not_found() => Ok(true),
                    Err(err) => Err(Error::from(err)),
                }
            })
            .await;
        let condition = format!("{} {namespace}/{name} to be gone", K::KIND);
        resolve(outcome, condition, last)
    }

    pub async fn wait_until_deployment_gone(
        &self,
        namespace: &str,
        name: &str,
        timeout: Duration,
    ) -> Result<()>
    where
        C: ResourceGetter<appsv1::Deployment>,
    {
        self.wait_until_gone::<appsv1::Deployment>(namespace, name, timeout)
            .await
    }
}
