use std::fmt::Debug;
use std::future::Future;

use k8s_e2e_ext as k8s;
use k8s_e2e_wait::ClientError;
use k8s_e2e_wait::PodLister;
use k8s_e2e_wait::ResourceGetter;
use kube::api;

use k8s::appsv1;
use k8s::corev1;
use k8s::openapi::NamespaceResourceScope;
use k8s::openapi::serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct KubeApi {
    get_params: api::GetParams,
    list_params: api::ListParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi configured with a default Kubernetes client.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), kube::Error> {
    /// let api = k8s_e2e_kubeapi::KubeApi::new().await?;
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> kube::Result<Self> {
        kube::Client::try_default().await.map(Self::with_client)
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    ///
    /// The returned KubeApi uses default `GetParams` and `ListParams` for
    /// every request.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            get_params: api::GetParams::default(),
            list_params: api::ListParams::default(),
            client,
        }
    }

    /// Lists the Pods of `namespace` matching the label `selector`.
    ///
    /// An empty selector lists every Pod in the namespace.
    pub async fn list_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> kube::Result<Vec<corev1::Pod>> {
        let lp = self.list_params_for(selector);
        self.namespaced::<corev1::Pod>(namespace)
            .list(&lp)
            .await
            .map(|list| list.items)
    }

    /// Fetches a single Pod by name.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(api: &k8s_e2e_kubeapi::KubeApi) -> kube::Result<()> {
    /// let pod = api.get_pod("monitoring", "prometheus-0").await?;
    /// println!("{:?}", pod.status.and_then(|status| status.phase));
    /// # Ok(()) }
    /// ```
    pub async fn get_pod(&self, namespace: &str, name: &str) -> kube::Result<corev1::Pod> {
        self.get(namespace, name).await
    }

    /// Fetches a single Deployment by name from `apps/v1`.
    pub async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> kube::Result<appsv1::Deployment> {
        self.get(namespace, name).await
    }

    /// Fetches the logs of one container of a Pod.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(api: &k8s_e2e_kubeapi::KubeApi) -> kube::Result<()> {
    /// let logs = api.get_logs("monitoring", "prometheus-0", "prometheus").await?;
    /// println!("{logs}");
    /// # Ok(()) }
    /// ```
    pub async fn get_logs(
        &self,
        namespace: &str,
        pod: &str,
        container: &str,
    ) -> kube::Result<String> {
        let lp = api::LogParams {
            container: Some(container.to_string()),
            ..api::LogParams::default()
        };
        self.namespaced::<corev1::Pod>(namespace)
            .logs(pod, &lp)
            .await
    }

    async fn get<K>(&self, namespace: &str, name: &str) -> kube::Result<K>
    where
        K: kube::Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let gp = self.get_params();
        self.namespaced::<K>(namespace).get_with(name, gp).await
    }

    /// Returns an Api handle scoped to `namespace` using the configured Kubernetes client.
    fn namespaced<K>(&self, namespace: &str) -> api::Api<K>
    where
        K: kube::Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn list_params_for(&self, selector: &str) -> api::ListParams {
        let lp = self.list_params().clone();
        if selector.is_empty() {
            lp
        } else {
            lp.labels(selector)
        }
    }

    fn get_params(&self) -> &api::GetParams {
        &self.get_params
    }

    fn list_params(&self) -> &api::ListParams {
        &self.list_params
    }
}

impl PodLister for KubeApi {
    fn list_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<corev1::Pod>, ClientError>> + Send {
        async move {
            Self::list_pods(self, namespace, selector)
                .await
                .map_err(|err| client_error(err, "namespaces", namespace))
        }
    }
}

impl<K> ResourceGetter<K> for KubeApi
where
    K: kube::Resource<Scope = NamespaceResourceScope>
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    fn get_resource(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<K, ClientError>> + Send {
        let kind = K::kind(&K::DynamicType::default()).to_string();
        async move {
            self.get::<K>(namespace, name)
                .await
                .map_err(|err| client_error(err, &kind, name))
        }
    }
}

impl Debug for KubeApi {
    /// Formats the `KubeApi` for debugging, showing `get_params` and `list_params` while redacting the `client`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApi")
            .field("get_params", &self.get_params)
            .field("list_params", &self.list_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}

/// Sorts a `kube::Error` into the error kinds the waits act upon.
fn client_error(err: kube::Error, kind: &str, name: &str) -> ClientError {
    let class = match &err {
        kube::Error::Api(response) => ErrorClass::from_status(response.code),
        _ => ErrorClass::Transient,
    };
    tracing::debug!(kind, name, ?class, %err, "Cluster API request failed");
    match class {
        ErrorClass::NotFound => ClientError::not_found(kind, name),
        ErrorClass::Transient => ClientError::Transient(Box::new(err)),
        ErrorClass::Fatal => ClientError::Fatal(Box::new(err)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ErrorClass {
    NotFound,
    Transient,
    Fatal,
}

impl ErrorClass {
    fn from_status(code: u16) -> Self {
        match code {
            404 => Self::NotFound,
            429 | 500..=599 => Self::Transient,
            _ => Self::Fatal,
        }
    }
}
