use std::future;
use std::future::Future;
use std::io;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use k8s_e2e_ext::PodExt as _;
use k8s_e2e_ext::appsv1;
use k8s_e2e_ext::corev1;

use super::*;

pub(crate) const NAMESPACE: &str = "e2e";

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) fn pod(name: &str, ready: bool) -> corev1::Pod {
    corev1::Pod::new(name, NAMESPACE)
        .with_container("app", "v1")
        .with_phase("Running")
        .with_ready(ready)
}

pub(crate) fn pod_with_image(name: &str, image: &str) -> corev1::Pod {
    corev1::Pod::new(name, NAMESPACE)
        .with_container("app", image)
        .with_phase("Running")
        .with_ready(true)
}

#[derive(Clone, Debug)]
pub(crate) enum Reply<T> {
    Ok(T),
    NotFound,
    Transient(&'static str),
    Fatal(&'static str),
}

impl<T> Reply<T> {
    fn into_result(self, kind: &str, name: &str) -> Result<T, ClientError> {
        match self {
            Self::Ok(item) => Ok(item),
            Self::NotFound => Err(ClientError::not_found(kind, name)),
            Self::Transient(reason) => Err(ClientError::Transient(io::Error::other(reason).into())),
            Self::Fatal(reason) => Err(ClientError::Fatal(io::Error::other(reason).into())),
        }
    }
}

/// Replays scripted replies in order, repeating the last one forever.
#[derive(Debug)]
pub(crate) struct Script<T> {
    replies: Vec<Reply<T>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    fn new(replies: Vec<Reply<T>>) -> Self {
        let calls = AtomicUsize::new(0);
        Self { replies, calls }
    }

    fn next(&self) -> Reply<T> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .get(call)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(Reply::NotFound)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub(crate) struct FakeCluster {
    pub(crate) pods: Script<Vec<corev1::Pod>>,
    pub(crate) deployments: Script<appsv1::Deployment>,
}

impl FakeCluster {
    pub(crate) fn with_pods(replies: Vec<Reply<Vec<corev1::Pod>>>) -> Self {
        Self {
            pods: Script::new(replies),
            deployments: Script::new(Vec::new()),
        }
    }

    pub(crate) fn with_deployments(replies: Vec<Reply<appsv1::Deployment>>) -> Self {
        Self {
            pods: Script::new(Vec::new()),
            deployments: Script::new(replies),
        }
    }
}

impl PodLister for FakeCluster {
    fn list_pods(
        &self,
        _namespace: &str,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<corev1::Pod>, ClientError>> + Send {
        future::ready(self.pods.next().into_result("pods", selector))
    }
}

impl ResourceGetter<appsv1::Deployment> for FakeCluster {
    fn get_resource(
        &self,
        _namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<appsv1::Deployment, ClientError>> + Send {
        future::ready(self.deployments.next().into_result("deployments", name))
    }
}
