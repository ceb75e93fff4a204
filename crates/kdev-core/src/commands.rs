//! Typed command inventory
//!
//! Every verb resolves to one `Command`. Conversion from an
//! `InvocationRequest` performs all argument typing, so handlers never see
//! raw strings that still need validating.

use crate::catalog::Catalog;
use crate::errors::{KdevError, Result};
use crate::features::Feature;
use crate::render::IngressSpec;
use crate::router::{InvocationRequest, VerbTarget};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Cluster lifecycle
    ClusterStart,
    ClusterStop,
    ClusterRestart,
    ClusterDelete,
    ClusterStatus,

    // Namespaces
    CreateNamespace { name: String },
    DeleteNamespace { name: String },

    // Applications
    DeployFile { path: PathBuf },
    DeleteFile { path: PathBuf },
    Scale {
        deployment: String,
        replicas: u32,
        namespace: String,
    },
    Logs { pod: String, namespace: String },
    Exec {
        pod: String,
        namespace: String,
        command: Vec<String>,
    },
    PortForward {
        resource: String,
        ports: String,
        namespace: String,
    },
    GetAll { namespace: String },

    // Components; `None` namespace means the catalog default
    DeployComponent {
        key: String,
        namespace: Option<String>,
    },
    RemoveComponent {
        key: String,
        namespace: Option<String>,
    },
    RenderComponent {
        key: String,
        namespace: Option<String>,
    },
    ListComponents,

    // Composition
    CreateEnvironment {
        name: String,
        namespace: Option<String>,
    },
    RunWizard {
        name: String,
        namespace: Option<String>,
    },
    EnableFeature(Feature),

    // Ingress
    CreateIngress { spec: IngressSpec, tls: bool },
    DeleteIngress { name: String, namespace: String },
    ListIngress { namespace: String },
    DescribeIngress { name: String, namespace: String },
    TestIngress { host: String, path: String },

    GenerateManifests {
        app: String,
        namespace: String,
        host: Option<String>,
    },

    BackupNamespace { namespace: String },
    BackupCluster,

    Monitor {
        namespace: String,
        interval_secs: u64,
    },

    Help,
    Menu,
}

/// One day
pub const MAX_MONITOR_INTERVAL_SECS: u64 = 86_400;

fn invalid(req: &InvocationRequest, argument: &str, reason: impl Into<String>) -> KdevError {
    KdevError::InvalidArgument {
        verb: req.verb.clone(),
        argument: argument.to_string(),
        reason: reason.into(),
    }
}

/// Split `service:port`, requiring a non-empty service and a numeric port
fn parse_service_port(req: &InvocationRequest, raw: &str) -> Result<(String, u16)> {
    let (service, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| invalid(req, "service:port", format!("'{}' has no ':<port>'", raw)))?;
    if service.is_empty() {
        return Err(invalid(req, "service:port", "service name is empty"));
    }
    let port = port
        .parse::<u16>()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| invalid(req, "service:port", format!("'{}' is not a valid port", port)))?;
    Ok((service.to_string(), port))
}

/// RFC 1123 label: namespaces and generated object names
pub fn is_dns_label(name: &str) -> bool {
    let bytes = name.as_bytes();
    let edge_ok = |b: Option<&u8>| b.is_some_and(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    (1..=63).contains(&bytes.len())
        && edge_ok(bytes.first())
        && edge_ok(bytes.last())
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

fn label(req: &InvocationRequest, argument: &str, value: String) -> Result<String> {
    if is_dns_label(&value) {
        Ok(value)
    } else {
        Err(invalid(
            req,
            argument,
            format!(
                "'{}' must be lowercase letters, digits or '-', start and end alphanumeric, at most 63 characters",
                value
            ),
        ))
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

impl Command {
    /// Convert a bound request into a typed command
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for values that fail conversion, `UnknownComponent`
    /// or `UnknownWizard` for unregistered names.
    pub fn from_invocation(req: &InvocationRequest, catalog: &Catalog) -> Result<Command> {
        let owned = |name: &str| -> Result<String> { req.require(name).map(str::to_string) };
        let optional = |name: &str| req.get(name).map(str::to_string);
        let namespace = || label(req, "namespace", owned("namespace")?);
        let namespace_opt = || optional("namespace").map(|ns| label(req, "namespace", ns)).transpose();

        match &req.target {
            VerbTarget::Component(key) => {
                return Ok(Command::DeployComponent {
                    key: key.clone(),
                    namespace: namespace_opt()?,
                })
            }
            VerbTarget::Environment(name) => {
                return Ok(Command::CreateEnvironment {
                    name: name.clone(),
                    namespace: namespace_opt()?,
                })
            }
            VerbTarget::Feature(feature) => return Ok(Command::EnableFeature(*feature)),
            VerbTarget::Fixed => {}
        }

        let command = match req.verb.as_str() {
            "start" => Command::ClusterStart,
            "stop" => Command::ClusterStop,
            "restart" => Command::ClusterRestart,
            "delete" => Command::ClusterDelete,
            "status" => Command::ClusterStatus,

            "create-ns" => Command::CreateNamespace {
                name: label(req, "name", owned("name")?)?,
            },
            "delete-ns" => Command::DeleteNamespace {
                name: label(req, "name", owned("name")?)?,
            },

            "deploy" => Command::DeployFile {
                path: PathBuf::from(owned("file")?),
            },
            "delete-app" => Command::DeleteFile {
                path: PathBuf::from(owned("file")?),
            },
            "scale" => {
                let raw = req.require("replicas")?;
                let replicas = raw.parse::<u32>().map_err(|_| {
                    invalid(
                        req,
                        "replicas",
                        format!("'{}' is not a non-negative integer", raw),
                    )
                })?;
                Command::Scale {
                    deployment: owned("deployment")?,
                    replicas,
                    namespace: namespace()?,
                }
            }
            "logs" => Command::Logs {
                pod: owned("pod")?,
                namespace: namespace()?,
            },
            "exec" => Command::Exec {
                pod: owned("pod")?,
                namespace: namespace()?,
                command: if req.rest.is_empty() {
                    vec![owned("command")?]
                } else {
                    req.rest.clone()
                },
            },
            "port-forward" => Command::PortForward {
                resource: owned("resource")?,
                ports: owned("ports")?,
                namespace: namespace()?,
            },
            "get-all" => Command::GetAll {
                namespace: namespace()?,
            },

            "remove-component" | "render" => {
                let key = catalog.component(req.require("component")?)?.key.to_string();
                let namespace = namespace_opt()?;
                if req.verb == "render" {
                    Command::RenderComponent { key, namespace }
                } else {
                    Command::RemoveComponent { key, namespace }
                }
            }
            "list" => Command::ListComponents,

            "wizard" => Command::RunWizard {
                name: catalog.wizard(req.require("name")?)?.name.clone(),
                namespace: namespace_opt()?,
            },

            "create-ingress" | "create-tls-ingress" => {
                let (service, port) = parse_service_port(req, req.require("service:port")?)?;
                Command::CreateIngress {
                    spec: IngressSpec {
                        name: owned("name")?,
                        host: owned("host")?,
                        service,
                        port,
                        namespace: namespace()?,
                        path: normalize_path(req.require("path")?),
                    },
                    tls: req.verb == "create-tls-ingress",
                }
            }
            "delete-ingress" => Command::DeleteIngress {
                name: owned("name")?,
                namespace: namespace()?,
            },
            "list-ingress" => Command::ListIngress {
                namespace: namespace()?,
            },
            "describe-ingress" => Command::DescribeIngress {
                name: owned("name")?,
                namespace: namespace()?,
            },
            "test-ingress" => Command::TestIngress {
                host: owned("host")?,
                path: normalize_path(req.require("path")?),
            },

            "generate-manifests" => Command::GenerateManifests {
                app: label(req, "app", owned("app")?)?,
                namespace: namespace()?,
                host: optional("host").filter(|h| !h.is_empty()),
            },

            "backup-namespace" => Command::BackupNamespace {
                namespace: namespace()?,
            },
            "backup" => Command::BackupCluster,

            "monitor" => {
                let raw = req.require("interval-seconds")?;
                let interval_secs = raw
                    .parse::<u64>()
                    .ok()
                    .filter(|s| (1..=MAX_MONITOR_INTERVAL_SECS).contains(s))
                    .ok_or_else(|| {
                        invalid(
                            req,
                            "interval-seconds",
                            format!(
                                "'{}' is not a whole number of seconds between 1 and {}",
                                raw, MAX_MONITOR_INTERVAL_SECS
                            ),
                        )
                    })?;
                Command::Monitor {
                    namespace: namespace()?,
                    interval_secs,
                }
            }

            "help" => Command::Help,
            "menu" => Command::Menu,

            other => {
                return Err(KdevError::UnknownCommand {
                    verb: other.to_string(),
                })
            }
        };
        Ok(command)
    }

    /// Verbs that require confirmation before any runtime call
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Command::ClusterDelete | Command::DeleteNamespace { .. }
        )
    }

    /// Confirmation question for destructive commands
    pub fn confirmation_prompt(&self) -> Option<String> {
        match self {
            Command::ClusterDelete => {
                Some("This deletes the local cluster and all its data. Continue?".to_string())
            }
            Command::DeleteNamespace { name } => Some(format!(
                "This deletes namespace '{}' and everything in it. Continue?",
                name
            )),
            _ => None,
        }
    }

    /// Stable operation name used in log events
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::ClusterStart => "cluster_start",
            Command::ClusterStop => "cluster_stop",
            Command::ClusterRestart => "cluster_restart",
            Command::ClusterDelete => "cluster_delete",
            Command::ClusterStatus => "cluster_status",
            Command::CreateNamespace { .. } => "create_namespace",
            Command::DeleteNamespace { .. } => "delete_namespace",
            Command::DeployFile { .. } => "deploy_file",
            Command::DeleteFile { .. } => "delete_file",
            Command::Scale { .. } => "scale",
            Command::Logs { .. } => "logs",
            Command::Exec { .. } => "exec",
            Command::PortForward { .. } => "port_forward",
            Command::GetAll { .. } => "get_all",
            Command::DeployComponent { .. } => "deploy_component",
            Command::RemoveComponent { .. } => "remove_component",
            Command::RenderComponent { .. } => "render_component",
            Command::ListComponents => "list_components",
            Command::CreateEnvironment { .. } => "create_environment",
            Command::RunWizard { .. } => "run_wizard",
            Command::EnableFeature(_) => "enable_feature",
            Command::CreateIngress { tls: false, .. } => "create_ingress",
            Command::CreateIngress { tls: true, .. } => "create_tls_ingress",
            Command::DeleteIngress { .. } => "delete_ingress",
            Command::ListIngress { .. } => "list_ingress",
            Command::DescribeIngress { .. } => "describe_ingress",
            Command::TestIngress { .. } => "test_ingress",
            Command::GenerateManifests { .. } => "generate_manifests",
            Command::BackupNamespace { .. } => "backup_namespace",
            Command::BackupCluster => "backup_cluster",
            Command::Monitor { .. } => "monitor",
            Command::Help => "help",
            Command::Menu => "menu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;

    fn route(verb: &str, args: &[&str]) -> Result<Command> {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        router.route(verb, &args).map(|(_, cmd)| cmd)
    }

    #[test]
    fn test_create_ingress_fields() {
        let cmd = route("create-ingress", &["foo", "foo.local", "svc:80", "ns", "/"]).unwrap();
        assert_eq!(
            cmd,
            Command::CreateIngress {
                spec: IngressSpec {
                    name: "foo".to_string(),
                    host: "foo.local".to_string(),
                    service: "svc".to_string(),
                    port: 80,
                    namespace: "ns".to_string(),
                    path: "/".to_string(),
                },
                tls: false,
            }
        );
    }

    #[test]
    fn test_service_port_validation() {
        for bad in ["svc", "svc:http", ":80", "svc:0", "svc:70000"] {
            let err = route("create-ingress", &["foo", "foo.local", bad]).unwrap_err();
            assert!(
                matches!(err, KdevError::InvalidArgument { ref argument, .. } if argument == "service:port"),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_path_normalized() {
        match route("create-tls-ingress", &["a", "a.local", "a:8080", "dev", "api"]).unwrap() {
            Command::CreateIngress { spec, tls } => {
                assert!(tls);
                assert_eq!(spec.path, "/api");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_scale_replicas_typed() {
        assert_eq!(
            route("scale", &["web", "3"]).unwrap(),
            Command::Scale {
                deployment: "web".to_string(),
                replicas: 3,
                namespace: "default".to_string(),
            }
        );
        assert!(matches!(
            route("scale", &["web", "-1"]),
            Err(KdevError::InvalidArgument { .. })
        ));
        assert!(matches!(
            route("scale", &["web"]),
            Err(KdevError::MissingArgument { position: 2, .. })
        ));
    }

    #[test]
    fn test_dynamic_verbs() {
        assert_eq!(
            route("deploy-kafka", &["streams"]).unwrap(),
            Command::DeployComponent {
                key: "kafka".to_string(),
                namespace: Some("streams".to_string()),
            }
        );
        assert_eq!(
            route("create-messaging-env", &[]).unwrap(),
            Command::CreateEnvironment {
                name: "messaging".to_string(),
                namespace: None,
            }
        );
        assert_eq!(
            route("enable-chaos", &[]).unwrap(),
            Command::EnableFeature(Feature::Chaos)
        );
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(matches!(
            route("render", &["oracle"]),
            Err(KdevError::UnknownComponent { .. })
        ));
        assert!(matches!(
            route("wizard", &["everything"]),
            Err(KdevError::UnknownWizard { .. })
        ));
    }

    #[test]
    fn test_monitor_interval() {
        assert_eq!(
            route("monitor", &[]).unwrap(),
            Command::Monitor {
                namespace: "default".to_string(),
                interval_secs: 5,
            }
        );
        assert!(route("monitor", &["dev", "0"]).is_err());
        assert!(route("monitor", &["dev", "86400"]).is_ok());
        for too_long in ["86401", "18446744073709551615"] {
            assert!(matches!(
                route("monitor", &["dev", too_long]),
                Err(KdevError::InvalidArgument { ref argument, .. }) if argument == "interval-seconds"
            ));
        }
    }

    #[test]
    fn test_destructive_commands() {
        assert!(route("delete", &[]).unwrap().is_destructive());
        assert!(route("delete-ns", &["dev"]).unwrap().is_destructive());
        assert!(!route("delete-app", &["x.yaml"]).unwrap().is_destructive());
        assert!(route("delete-ns", &["dev"])
            .unwrap()
            .confirmation_prompt()
            .unwrap()
            .contains("'dev'"));
    }

    #[test]
    fn test_names_must_be_dns_labels() {
        for bad in ["../../x", "MyApp", "-web", "web-", "a_b", ""] {
            assert!(
                matches!(
                    route("generate-manifests", &[bad, "dev"]),
                    Err(KdevError::InvalidArgument { ref argument, .. }) if argument == "app"
                ),
                "{:?}",
                bad
            );
        }
        assert!(matches!(
            route("generate-manifests", &["web", "Dev"]),
            Err(KdevError::InvalidArgument { ref argument, .. }) if argument == "namespace"
        ));
        assert!(matches!(
            route("create-ns", &["team/a"]),
            Err(KdevError::InvalidArgument { .. })
        ));
        assert!(matches!(
            route("deploy-redis", &["Cache"]),
            Err(KdevError::InvalidArgument { .. })
        ));
        assert!(is_dns_label("web-0"));
        assert!(!is_dns_label(&"a".repeat(64)));
    }

    #[test]
    fn test_generate_manifests_host_optional() {
        assert_eq!(
            route("generate-manifests", &["myapp", "dev"]).unwrap(),
            Command::GenerateManifests {
                app: "myapp".to_string(),
                namespace: "dev".to_string(),
                host: None,
            }
        );
    }
}
