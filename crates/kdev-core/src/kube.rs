//! Namespace and manifest primitives shared by handlers and the composer

use crate::errors::Result;
use crate::runtime::{ClusterRuntime, RuntimeCall};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceOutcome {
    Created,
    AlreadyExisted,
}

pub fn create_namespace_call(name: &str) -> RuntimeCall {
    RuntimeCall::kubectl(["create", "namespace", name])
}

/// Create a namespace; an existing namespace counts as success
///
/// # Errors
///
/// Any runtime failure other than AlreadyExists.
pub fn ensure_namespace(runtime: &dyn ClusterRuntime, name: &str) -> Result<NamespaceOutcome> {
    match runtime.run(&create_namespace_call(name)) {
        Ok(_) => Ok(NamespaceOutcome::Created),
        Err(e) if e.is_already_exists() => {
            tracing::debug!(namespace = name, "namespace already exists");
            Ok(NamespaceOutcome::AlreadyExisted)
        }
        Err(e) => Err(e),
    }
}

/// Submit a rendered manifest through `kubectl apply -f -`
///
/// # Errors
///
/// `RuntimeCallFailed` if kubectl rejects the manifest.
pub fn apply_manifest(runtime: &dyn ClusterRuntime, manifest: &str) -> Result<String> {
    runtime.run(&RuntimeCall::kubectl(["apply", "-f", "-"]).with_stdin(manifest))
}

/// Delete the objects in a rendered manifest; missing objects are ignored
///
/// # Errors
///
/// `RuntimeCallFailed` if kubectl fails for another reason.
pub fn delete_manifest(runtime: &dyn ClusterRuntime, manifest: &str) -> Result<String> {
    runtime.run(
        &RuntimeCall::kubectl(["delete", "-f", "-", "--ignore-not-found"]).with_stdin(manifest),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RecordingRuntime;

    #[test]
    fn test_ensure_namespace_twice_succeeds() {
        let rt = RecordingRuntime::new();
        assert_eq!(ensure_namespace(&rt, "dev").unwrap(), NamespaceOutcome::Created);

        let rt = RecordingRuntime::new().fail_when(
            "create namespace dev",
            "Error from server (AlreadyExists): namespaces \"dev\" already exists",
        );
        assert_eq!(
            ensure_namespace(&rt, "dev").unwrap(),
            NamespaceOutcome::AlreadyExisted
        );
        assert_eq!(
            ensure_namespace(&rt, "dev").unwrap(),
            NamespaceOutcome::AlreadyExisted
        );
    }

    #[test]
    fn test_ensure_namespace_propagates_other_failures() {
        let rt = RecordingRuntime::new().fail_when("create namespace", "connection refused");
        assert!(ensure_namespace(&rt, "dev").is_err());
    }

    #[test]
    fn test_apply_and_delete_pipe_stdin() {
        let rt = RecordingRuntime::new();
        apply_manifest(&rt, "kind: A").unwrap();
        delete_manifest(&rt, "kind: B").unwrap();
        assert_eq!(
            rt.command_lines(),
            vec!["kubectl apply -f -", "kubectl delete -f - --ignore-not-found"]
        );
        assert_eq!(rt.submitted_manifests(), vec!["kind: A", "kind: B"]);
    }
}
