//! Optional cluster features
//!
//! Each toggle expands to a fixed, ordered list of runtime calls. Helm repo
//! registration is re-run every time; "already exists" from `helm repo add`
//! is treated as success by the executor.

use crate::errors::{KdevError, Result};
use crate::runtime::{ClusterRuntime, RuntimeCall, Tool};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Monitoring,
    Istio,
    Ingress,
    Chaos,
    Dashboard,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Monitoring,
        Feature::Istio,
        Feature::Ingress,
        Feature::Chaos,
        Feature::Dashboard,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Feature::Monitoring => "monitoring",
            Feature::Istio => "istio",
            Feature::Ingress => "ingress",
            Feature::Chaos => "chaos",
            Feature::Dashboard => "dashboard",
        }
    }

    pub fn verb(&self) -> String {
        format!("enable-{}", self.key())
    }

    pub fn description(&self) -> &'static str {
        match self {
            Feature::Monitoring => "Prometheus and Grafana via kube-prometheus-stack",
            Feature::Istio => "Istio service mesh (base + istiod)",
            Feature::Ingress => "NGINX ingress controller addon",
            Feature::Chaos => "Chaos Mesh fault injection",
            Feature::Dashboard => "Kubernetes dashboard and metrics-server addons",
        }
    }

    /// Runtime calls that enable this feature, in execution order
    pub fn calls(&self) -> Vec<RuntimeCall> {
        match self {
            Feature::Monitoring => vec![
                RuntimeCall::helm([
                    "repo",
                    "add",
                    "prometheus-community",
                    "https://prometheus-community.github.io/helm-charts",
                ]),
                RuntimeCall::helm(["repo", "update"]),
                RuntimeCall::helm([
                    "upgrade",
                    "--install",
                    "monitoring",
                    "prometheus-community/kube-prometheus-stack",
                    "--namespace",
                    "monitoring",
                    "--create-namespace",
                    "--set",
                    "grafana.adminPassword=admin",
                ]),
            ],
            Feature::Istio => vec![
                RuntimeCall::helm([
                    "repo",
                    "add",
                    "istio",
                    "https://istio-release.storage.googleapis.com/charts",
                ]),
                RuntimeCall::helm(["repo", "update"]),
                RuntimeCall::helm([
                    "upgrade",
                    "--install",
                    "istio-base",
                    "istio/base",
                    "--namespace",
                    "istio-system",
                    "--create-namespace",
                ]),
                RuntimeCall::helm([
                    "upgrade",
                    "--install",
                    "istiod",
                    "istio/istiod",
                    "--namespace",
                    "istio-system",
                    "--wait",
                ]),
                RuntimeCall::kubectl([
                    "label",
                    "namespace",
                    "default",
                    "istio-injection=enabled",
                    "--overwrite",
                ]),
            ],
            Feature::Ingress => vec![
                RuntimeCall::minikube(["addons", "enable", "ingress"]),
                RuntimeCall::kubectl([
                    "wait",
                    "--namespace",
                    "ingress-nginx",
                    "--for=condition=ready",
                    "pod",
                    "--selector=app.kubernetes.io/component=controller",
                    "--timeout=120s",
                ]),
            ],
            Feature::Chaos => vec![
                RuntimeCall::helm([
                    "repo",
                    "add",
                    "chaos-mesh",
                    "https://charts.chaos-mesh.org",
                ]),
                RuntimeCall::helm(["repo", "update"]),
                RuntimeCall::helm([
                    "upgrade",
                    "--install",
                    "chaos-mesh",
                    "chaos-mesh/chaos-mesh",
                    "--namespace",
                    "chaos-mesh",
                    "--create-namespace",
                    "--set",
                    "chaosDaemon.runtime=containerd",
                    "--set",
                    "chaosDaemon.socketPath=/run/containerd/containerd.sock",
                ]),
            ],
            Feature::Dashboard => vec![
                RuntimeCall::minikube(["addons", "enable", "metrics-server"]),
                RuntimeCall::minikube(["addons", "enable", "dashboard"]),
            ],
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether a failed call may be downgraded to a warning
///
/// Re-adding a helm repository that is already registered is harmless.
pub fn is_benign_failure(call: &RuntimeCall, err: &KdevError) -> bool {
    let repo_add = call.args.first().map(String::as_str) == Some("repo")
        && call.args.get(1).map(String::as_str) == Some("add");
    err.is_already_exists() && (repo_add || call.tool != Tool::Helm)
}

/// Run a feature's calls in order, stopping at the first real failure
///
/// Returns the warnings for downgraded failures.
///
/// # Errors
///
/// The first `RuntimeCallFailed` that is not benign.
pub fn enable_feature(runtime: &dyn ClusterRuntime, feature: Feature) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    for call in feature.calls() {
        match runtime.run(&call) {
            Ok(_) => {}
            Err(e) if is_benign_failure(&call, &e) => {
                tracing::debug!(feature = feature.key(), call = %call, "downgraded failure");
                warnings.push(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RecordingRuntime;

    #[test]
    fn test_verbs_derive_from_keys() {
        for feature in Feature::ALL {
            assert_eq!(feature.verb(), format!("enable-{}", feature.key()));
        }
        assert_eq!(Feature::Chaos.verb(), "enable-chaos");
    }

    #[test]
    fn test_monitoring_adds_repo_before_install() {
        let calls = Feature::Monitoring.calls();
        assert_eq!(calls[0].tool, Tool::Helm);
        assert!(calls[0].command_line().starts_with("helm repo add prometheus-community"));
        assert!(calls
            .last()
            .unwrap()
            .command_line()
            .contains("kube-prometheus-stack"));
    }

    #[test]
    fn test_ingress_waits_for_controller() {
        let lines: Vec<_> = Feature::Ingress
            .calls()
            .iter()
            .map(RuntimeCall::command_line)
            .collect();
        assert_eq!(lines[0], "minikube addons enable ingress");
        assert!(lines[1].starts_with("kubectl wait --namespace ingress-nginx"));
    }

    #[test]
    fn test_benign_repo_add_failure() {
        let add = RuntimeCall::helm(["repo", "add", "istio", "https://x"]);
        let err = add.failed(Some(1), "repository name (istio) already exists");
        assert!(is_benign_failure(&add, &err));

        let install = RuntimeCall::helm(["upgrade", "--install", "x", "y"]);
        let err = install.failed(Some(1), "timed out");
        assert!(!is_benign_failure(&install, &err));
    }

    #[test]
    fn test_enable_feature_tolerates_existing_repo() {
        let rt = RecordingRuntime::new().fail_when(
            "repo add chaos-mesh",
            "Error: repository name (chaos-mesh) already exists",
        );
        let warnings = enable_feature(&rt, Feature::Chaos).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(rt.calls().len(), 3);
    }

    #[test]
    fn test_enable_feature_stops_on_failure() {
        let rt = RecordingRuntime::new().fail_when("addons enable metrics-server", "not running");
        assert!(enable_feature(&rt, Feature::Dashboard).is_err());
        assert_eq!(rt.calls().len(), 1);
    }
}
