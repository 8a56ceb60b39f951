//! Pure classification of pod snapshots, free of any cluster I/O.

use k8s_e2e_ext::PodExt as _;
use k8s_e2e_ext::PodStatusError;
use k8s_e2e_ext::corev1;

/// Number of pods that are running with every container passing readiness.
///
/// A single unclassifiable pod fails the whole snapshot.
pub fn running_and_ready(pods: &[corev1::Pod]) -> Result<usize, PodStatusError> {
    pods.iter().try_fold(0, |count, pod| {
        pod.running_and_ready()
            .map(|ready| if ready { count + 1 } else { count })
    })
}

/// Number of pods with at least one container running exactly `image`.
pub fn running_image(pods: &[corev1::Pod], image: &str) -> usize {
    pods.iter().filter(|pod| pod.runs_image(image)).count()
}
