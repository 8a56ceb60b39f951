use super::*;

const PHASE_RUNNING: &str = "Running";
const PHASE_SUCCEEDED: &str = "Succeeded";
const PHASE_FAILED: &str = "Failed";
const CONDITION_READY: &str = "Ready";
const CONDITION_TRUE: &str = "True";
const CONDITION_FALSE: &str = "False";

/// A pod whose status cannot be classified as either ready or not yet ready.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PodStatusError {
    #[error("pod {pod} completed with phase {phase}")]
    Completed { pod: String, phase: String },
    #[error("pod {pod} is running but reports no Ready condition")]
    ReadyConditionMissing { pod: String },
}

pub trait PodExt {
    fn new(name: impl ToString, namespace: impl ToString) -> Self;

    fn phase(&self) -> Option<&str>;

    /// Classifies the pod as running and ready.
    ///
    /// A pod is running and ready when its phase is `Running`, its `Ready`
    /// condition is `True` and every reported container status is ready.
    /// Pending pods (or pods with no status yet) are simply not ready.
    ///
    /// # Errors
    ///
    /// Fails for a pod that already completed (`Succeeded` or `Failed`) and
    /// for a running pod without a `Ready` condition.
    fn running_and_ready(&self) -> Result<bool, PodStatusError>;

    /// Whether any container in the pod spec runs exactly `image`.
    /// No tag or registry normalization is applied.
    fn runs_image(&self, image: &str) -> bool;

    fn with_container(self, name: impl ToString, image: impl ToString) -> Self;

    fn with_phase(self, phase: impl ToString) -> Self;

    /// Sets the `Ready` condition and the readiness of one container status
    /// per spec container, so call it after [`PodExt::with_container`].
    fn with_ready(self, ready: bool) -> Self;
}

impl PodExt for corev1::Pod {
    fn new(name: impl ToString, namespace: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::with_namespace(name, namespace);
        Self {
            metadata,
            ..default()
        }
    }

    fn phase(&self) -> Option<&str> {
        self.status.as_ref()?.phase.as_deref()
    }

    fn running_and_ready(&self) -> Result<bool, PodStatusError> {
        let pod = || self.metadata.name.clone().unwrap_or_default();
        match self.phase() {
            Some(phase @ (PHASE_SUCCEEDED | PHASE_FAILED)) => Err(PodStatusError::Completed {
                pod: pod(),
                phase: phase.to_string(),
            }),
            Some(PHASE_RUNNING) => {
                let status = self.status.as_ref();
                let ready = status
                    .and_then(|status| status.conditions.as_deref())
                    .unwrap_or_default()
                    .iter()
                    .find(|condition| condition.type_ == CONDITION_READY)
                    .ok_or_else(|| PodStatusError::ReadyConditionMissing { pod: pod() })?;
                let containers_ready = status
                    .and_then(|status| status.container_statuses.as_deref())
                    .unwrap_or_default()
                    .iter()
                    .all(|container| container.ready);
                Ok(ready.status == CONDITION_TRUE && containers_ready)
            }
            _ => Ok(false),
        }
    }

    fn runs_image(&self, image: &str) -> bool {
        self.spec
            .iter()
            .flat_map(|spec| &spec.containers)
            .any(|container| container.image.as_deref() == Some(image))
    }

    fn with_container(mut self, name: impl ToString, image: impl ToString) -> Self {
        let container = corev1::Container {
            name: name.to_string(),
            image: Some(image.to_string()),
            ..default()
        };
        self.spec
            .get_or_insert_with(default)
            .containers
            .push(container);
        self
    }

    fn with_phase(mut self, phase: impl ToString) -> Self {
        self.status.get_or_insert_with(default).phase = Some(phase.to_string());
        self
    }

    fn with_ready(mut self, ready: bool) -> Self {
        let container_statuses = self
            .spec
            .iter()
            .flat_map(|spec| &spec.containers)
            .map(|container| corev1::ContainerStatus {
                name: container.name.clone(),
                image: container.image.clone().unwrap_or_default(),
                ready,
                ..default()
            })
            .collect();
        let status = if ready { CONDITION_TRUE } else { CONDITION_FALSE };
        let condition = corev1::PodCondition {
            type_: CONDITION_READY.to_string(),
            status: status.to_string(),
            ..default()
        };
        let status = self.status.get_or_insert_with(default);
        status.conditions = Some(vec![condition]);
        status.container_statuses = Some(container_statuses);
        self
    }
}
