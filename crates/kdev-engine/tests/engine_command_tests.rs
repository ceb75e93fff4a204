use kdev_core::catalog::Catalog;
use kdev_core::commands::Command;
use kdev_core::compose::StepStatus;
use kdev_core::config::KdevConfig;
use kdev_core::errors::KdevError;
use kdev_core::report::{Level, MemoryReporter};
use kdev_core::router::Router;
use kdev_core::runtime::RecordingRuntime;
use kdev_core_types::RequestId;
use kdev_engine::{apply_command, CommandOutcome, EngineContext, StaticPrompt};
use std::fs;
use tempfile::TempDir;

struct Harness {
    catalog: Catalog,
    config: KdevConfig,
    reporter: MemoryReporter,
    dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(KdevConfig::default())
    }

    fn with_config(config: KdevConfig) -> Self {
        Self {
            catalog: Catalog::with_config(&config).unwrap(),
            config,
            reporter: MemoryReporter::new(),
            dir: TempDir::new().unwrap(),
        }
    }

    fn command(&self, verb: &str, args: &[&str]) -> Command {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Router::new(&self.catalog).route(verb, &args).unwrap().1
    }

    fn run(
        &self,
        rt: &RecordingRuntime,
        confirm: bool,
        verb: &str,
        args: &[&str],
    ) -> Result<CommandOutcome, KdevError> {
        let prompt = StaticPrompt(confirm);
        let ctx = EngineContext::new(rt, &self.catalog, &self.config, &self.reporter, &prompt)
            .with_work_dir(self.dir.path())
            .with_backup_root(self.dir.path().join("backups"))
            .with_monitor_iterations(1);
        apply_command(self.command(verb, args), &ctx, &RequestId::new())
    }
}

#[test]
fn test_declined_destructive_commands_make_no_calls() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();

    assert_eq!(
        h.run(&rt, false, "delete-ns", &["dev"]).unwrap(),
        CommandOutcome::Declined
    );
    assert_eq!(h.run(&rt, false, "delete", &[]).unwrap(), CommandOutcome::Declined);
    assert!(rt.calls().is_empty());
    assert!(h.reporter.contains(Level::Warn, "Cancelled"));
}

#[test]
fn test_confirmed_namespace_delete() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    h.run(&rt, true, "delete-ns", &["dev"]).unwrap();
    assert_eq!(rt.command_lines(), vec!["kubectl delete namespace dev"]);
}

#[test]
fn test_start_uses_cluster_config() {
    let config = KdevConfig::from_toml_str(
        "[cluster]\nprofile = \"lab\"\ncpus = 2\nmemory = 4096\nnode_ready_timeout_secs = 90\n",
    )
    .unwrap();
    let h = Harness::with_config(config);
    let rt = RecordingRuntime::new();
    h.run(&rt, true, "start", &[]).unwrap();

    assert_eq!(
        rt.command_lines(),
        vec![
            "minikube start -p lab --driver=docker --cpus=2 --memory=4096mb",
            "kubectl wait --for=condition=Ready nodes --all --timeout=90s",
        ]
    );
    assert!(rt.calls()[0].interactive);
}

#[test]
fn test_deploy_missing_file_fails_before_runtime() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    let missing = h.dir.path().join("nope.yaml");
    let err = h
        .run(&rt, true, "deploy", &[missing.to_str().unwrap()])
        .unwrap_err();
    assert!(matches!(err, KdevError::FileNotFound { .. }));
    assert!(rt.calls().is_empty());
}

#[test]
fn test_deploy_component_creates_namespace_then_applies() {
    let h = Harness::new();
    let rt = RecordingRuntime::new().fail_when(
        "create namespace",
        "Error from server (AlreadyExists): namespaces \"cache\" already exists",
    );
    h.run(&rt, true, "deploy-redis", &["cache"]).unwrap();

    assert_eq!(
        rt.command_lines(),
        vec!["kubectl create namespace cache", "kubectl apply -f -"]
    );
    assert!(rt.submitted_manifests()[0].contains("namespace: cache"));
}

#[test]
fn test_environment_with_failing_member_still_exits_ok() {
    let h = Harness::new();
    let rt = RecordingRuntime::new().fail_when("apply -f -", "quota exceeded");
    match h.run(&rt, true, "create-database-env", &[]).unwrap() {
        CommandOutcome::Composition(report) => {
            assert_eq!(report.count(StepStatus::Failed), 4);
            assert_eq!(report.outcomes.len(), 5);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_wizard_runs_features_after_environments() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    h.run(&rt, true, "wizard", &["observability", "obs"]).unwrap();

    let lines = rt.command_lines();
    assert_eq!(lines[0], "kubectl create namespace obs");
    let last_apply = lines.iter().rposition(|l| l == "kubectl apply -f -").unwrap();
    let first_helm = lines.iter().position(|l| l.starts_with("helm")).unwrap();
    assert!(last_apply < first_helm);
    assert_eq!(lines.last().unwrap(), "minikube addons enable dashboard");
}

#[test]
fn test_tls_ingress_flow_reuses_existing_secret() {
    let h = Harness::new();
    let rt = RecordingRuntime::new().fail_when(
        "create secret tls",
        "error: failed to create secret secrets \"web-tls\" already exists",
    );
    h.run(
        &rt,
        true,
        "create-tls-ingress",
        &["web", "web.local", "web:8080", "dev"],
    )
    .unwrap();

    let lines = rt.command_lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("openssl req -x509"));
    assert!(lines[0].ends_with("-subj /CN=web.local/O=kdev"));
    assert!(lines[1].starts_with("kubectl create secret tls web-tls"));
    assert_eq!(lines[2], "kubectl apply -f -");
    assert!(rt.submitted_manifests()[0].contains("secretName: web-tls"));
    assert!(h.reporter.contains(Level::Warn, "already exists"));
}

#[test]
fn test_test_ingress_uses_cluster_ip() {
    let h = Harness::new();
    let rt = RecordingRuntime::new()
        .respond_when("minikube ip", "192.168.49.2\n")
        .respond_when("curl", "200");
    h.run(&rt, true, "test-ingress", &["foo.local", "health"]).unwrap();

    assert_eq!(
        rt.command_lines()[1],
        "curl -s -o /dev/null -w %{http_code} -H 'Host: foo.local' http://192.168.49.2/health"
    );
    assert!(h.reporter.contains(Level::Success, "HTTP 200"));
}

#[test]
fn test_generate_manifests_writes_six_files() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    let outcome = h.run(&rt, true, "generate-manifests", &["myapp", "dev"]).unwrap();

    let dir = h.dir.path().join("manifests-myapp");
    let mut names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "configmap.yaml",
            "deployment.yaml",
            "hpa.yaml",
            "pvc.yaml",
            "secret.yaml",
            "service.yaml"
        ]
    );
    for name in &names {
        let body = fs::read_to_string(dir.join(name)).unwrap();
        assert!(body.contains("namespace: dev"));
        assert!(body.contains("myapp"));
        let _: serde_yaml::Value = serde_yaml::from_str(&body).unwrap();
    }
    assert!(matches!(outcome, CommandOutcome::Generated(ref p) if p.len() == 6));
    assert!(rt.calls().is_empty());
}

#[test]
fn test_regenerating_without_host_drops_ingress() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    let dir = h.dir.path().join("manifests-shop");

    h.run(&rt, true, "generate-manifests", &["shop", "dev", "shop.local"]).unwrap();
    assert!(dir.join("ingress.yaml").is_file());

    h.run(&rt, true, "generate-manifests", &["shop", "dev"]).unwrap();
    assert!(!dir.join("ingress.yaml").exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 6);
    assert!(h.reporter.contains(Level::Warn, "ingress.yaml"));
}

#[test]
fn test_backup_namespace_layout() {
    let h = Harness::new();
    let rt = RecordingRuntime::new()
        .respond_when("config current-context", "minikube\n")
        .fail_when("get cronjobs", "the server doesn't have a resource type")
        .respond_when("get", "apiVersion: v1\nkind: List\nitems: []\n");

    let root = match h.run(&rt, true, "backup-namespace", &["dev"]).unwrap() {
        CommandOutcome::BackedUp(root) => root,
        other => panic!("unexpected outcome {:?}", other),
    };

    assert!(root
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("minikube-"));
    assert!(root.starts_with(h.dir.path().join("backups")));
    assert!(root.join("dev").join("deployments.yaml").is_file());
    assert!(!root.join("dev").join("cronjobs.yaml").exists());
    assert!(h.reporter.contains(Level::Warn, "cronjobs"));
}

#[test]
fn test_backup_with_empty_exports_writes_nothing() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();

    let root = match h.run(&rt, true, "backup-namespace", &["dev"]).unwrap() {
        CommandOutcome::BackedUp(root) => root,
        other => panic!("unexpected outcome {:?}", other),
    };

    assert!(!root.exists());
    assert!(!h.dir.path().join("backups").exists());
    assert!(h.reporter.contains(Level::Warn, "no output"));
}

#[test]
fn test_full_backup_covers_cluster_and_namespaces() {
    let h = Harness::new();
    let rt = RecordingRuntime::new()
        .respond_when("config current-context", "kind-dev")
        .respond_when(
            "get namespaces -o json",
            r#"{"items":[{"metadata":{"name":"default"}},{"metadata":{"name":"apps"}}]}"#,
        )
        .respond_when("-o yaml", "kind: List\n");

    let root = match h.run(&rt, true, "backup", &[]).unwrap() {
        CommandOutcome::BackedUp(root) => root,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert!(root.join("cluster").join("storageclasses.yaml").is_file());
    assert!(root.join("default").join("services.yaml").is_file());
    assert!(root.join("apps").join("secrets.yaml").is_file());
}

#[test]
fn test_scale_and_exec_calls() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    h.run(&rt, true, "scale", &["web", "3", "dev"]).unwrap();
    h.run(&rt, true, "exec", &["web-0", "dev", "ls", "-la"]).unwrap();

    assert_eq!(
        rt.command_lines(),
        vec![
            "kubectl scale deployment/web --replicas=3 -n dev",
            "kubectl exec -it web-0 -n dev -- ls -la",
        ]
    );
    assert!(rt.calls()[1].interactive);
}

#[test]
fn test_exec_passes_arguments_through_unsplit() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    h.run(&rt, true, "exec", &["web-0", "dev", "sh", "-c", "echo a b"]).unwrap();

    let call = &rt.calls()[0];
    assert_eq!(
        call.args[call.args.len() - 3..],
        ["sh".to_string(), "-c".to_string(), "echo a b".to_string()]
    );
}

#[test]
fn test_monitor_honours_iteration_bound() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    let outcome = h.run(&rt, true, "monitor", &["dev", "1"]).unwrap();
    assert_eq!(outcome, CommandOutcome::Monitored { iterations: 1 });
}

#[test]
fn test_render_does_not_touch_cluster() {
    let h = Harness::new();
    let rt = RecordingRuntime::new();
    match h.run(&rt, true, "render", &["kafka", "streams"]).unwrap() {
        CommandOutcome::Rendered(body) => assert!(body.contains("namespace: streams")),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(rt.calls().is_empty());
}

#[test]
fn test_feature_toggle_failure_is_fatal() {
    let h = Harness::new();
    let rt = RecordingRuntime::new().fail_when("addons enable ingress", "minikube is not running");
    let err = h.run(&rt, true, "enable-ingress", &[]).unwrap_err();
    assert!(matches!(err, KdevError::RuntimeCallFailed { .. }));
}
