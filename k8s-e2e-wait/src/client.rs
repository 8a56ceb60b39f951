use std::error::Error as StdError;
use std::future::Future;

use k8s_e2e_ext::corev1;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Failure of a single list or get against the cluster.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{kind} {name:?} not found")]
    NotFound { kind: String, name: String },
    /// Infrastructure hiccup such as a dropped connection or a 5xx response.
    #[error("transient cluster API failure: {0}")]
    Transient(#[source] BoxError),
    #[error("cluster API failure: {0}")]
    Fatal(#[source] BoxError),
}

impl ClientError {
    pub fn not_found(kind: impl ToString, name: impl ToString) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Lists the pods of a namespace, optionally narrowed by a label selector.
pub trait PodLister {
    /// `selector` uses the usual label selector syntax (`app=web,tier!=db`);
    /// an empty selector matches every pod in the namespace.
    fn list_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<corev1::Pod>, ClientError>> + Send;
}

/// Fetches a single named resource of kind `K`.
pub trait ResourceGetter<K> {
    fn get_resource(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<K, ClientError>> + Send;
}
