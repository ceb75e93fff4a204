//! Command router
//!
//! One dispatch table serves both front ends. Fixed verbs come from a static
//! table; `deploy-<component>`, environment verbs and `enable-<feature>` are
//! derived from the catalog. Parsing binds positional arguments to named
//! slots and applies declared defaults, and never touches the cluster.

use crate::catalog::Catalog;
use crate::commands::Command;
use crate::errors::{KdevError, Result};
use crate::features::Feature;
use kdev_core_types::RequestId;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Cluster,
    Namespaces,
    Apps,
    Components,
    Environments,
    Wizards,
    Features,
    Ingress,
    Manifests,
    Backup,
    Monitoring,
    Help,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Cluster,
        Category::Namespaces,
        Category::Apps,
        Category::Components,
        Category::Environments,
        Category::Wizards,
        Category::Features,
        Category::Ingress,
        Category::Manifests,
        Category::Backup,
        Category::Monitoring,
        Category::Help,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Category::Cluster => "Cluster management",
            Category::Namespaces => "Namespaces",
            Category::Apps => "Applications",
            Category::Components => "Components",
            Category::Environments => "Environments",
            Category::Wizards => "Setup wizards",
            Category::Features => "Cluster features",
            Category::Ingress => "Ingress",
            Category::Manifests => "Manifest generation",
            Category::Backup => "Backup",
            Category::Monitoring => "Monitoring",
            Category::Help => "Help",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgDefault {
    Required,
    Value(&'static str),
    /// Resolved later from the catalog (component or environment namespace)
    Contextual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub default: ArgDefault,
    /// Swallows all remaining arguments
    pub variadic: bool,
}

impl ArgSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: ArgDefault::Required,
            variadic: false,
        }
    }

    pub const fn optional(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: ArgDefault::Value(default),
            variadic: false,
        }
    }

    pub const fn contextual(name: &'static str) -> Self {
        Self {
            name,
            default: ArgDefault::Contextual,
            variadic: false,
        }
    }

    pub const fn rest(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: ArgDefault::Value(default),
            variadic: true,
        }
    }

    pub fn is_required(&self) -> bool {
        self.default == ArgDefault::Required
    }

    fn usage(&self) -> String {
        if self.is_required() {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        }
    }
}

const NAMESPACE: ArgSpec = ArgSpec::optional("namespace", "default");
const CTX_NAMESPACE: ArgSpec = ArgSpec::contextual("namespace");

struct FixedVerb {
    verb: &'static str,
    category: Category,
    summary: &'static str,
    args: &'static [ArgSpec],
}

macro_rules! fixed {
    ($verb:expr, $category:expr, $summary:expr, $args:expr $(,)?) => {
        FixedVerb {
            verb: $verb,
            category: $category,
            summary: $summary,
            args: $args,
        }
    };
}

const INGRESS_ARGS: &[ArgSpec] = &[
    ArgSpec::required("name"),
    ArgSpec::required("host"),
    ArgSpec::required("service:port"),
    NAMESPACE,
    ArgSpec::optional("path", "/"),
];

const FIXED_VERBS: &[FixedVerb] = &[
    fixed!("start", Category::Cluster, "Start the local cluster", &[]),
    fixed!("stop", Category::Cluster, "Stop the local cluster", &[]),
    fixed!("restart", Category::Cluster, "Stop then start the local cluster", &[]),
    fixed!("delete", Category::Cluster, "Delete the local cluster", &[]),
    fixed!("status", Category::Cluster, "Show cluster status and nodes", &[]),
    fixed!(
        "create-ns",
        Category::Namespaces,
        "Create a namespace",
        &[ArgSpec::required("name")],
    ),
    fixed!(
        "delete-ns",
        Category::Namespaces,
        "Delete a namespace and everything in it",
        &[ArgSpec::required("name")],
    ),
    fixed!(
        "deploy",
        Category::Apps,
        "Apply a manifest file",
        &[ArgSpec::required("file")],
    ),
    fixed!(
        "delete-app",
        Category::Apps,
        "Delete the objects in a manifest file",
        &[ArgSpec::required("file")],
    ),
    fixed!(
        "scale",
        Category::Apps,
        "Scale a deployment",
        &[
            ArgSpec::required("deployment"),
            ArgSpec::required("replicas"),
            NAMESPACE,
        ],
    ),
    fixed!(
        "logs",
        Category::Apps,
        "Follow a pod's logs",
        &[ArgSpec::required("pod"), NAMESPACE],
    ),
    fixed!(
        "exec",
        Category::Apps,
        "Open a shell or run a command in a pod",
        &[
            ArgSpec::required("pod"),
            NAMESPACE,
            ArgSpec::rest("command", "/bin/sh"),
        ],
    ),
    fixed!(
        "port-forward",
        Category::Apps,
        "Forward local ports to a resource",
        &[
            ArgSpec::required("resource"),
            ArgSpec::required("ports"),
            NAMESPACE,
        ],
    ),
    fixed!(
        "get-all",
        Category::Apps,
        "List all resources in a namespace",
        &[NAMESPACE],
    ),
    fixed!(
        "remove-component",
        Category::Components,
        "Delete a deployed component",
        &[ArgSpec::required("component"), CTX_NAMESPACE],
    ),
    fixed!(
        "render",
        Category::Components,
        "Print a component manifest without applying it",
        &[ArgSpec::required("component"), CTX_NAMESPACE],
    ),
    fixed!("list", Category::Components, "List available components", &[]),
    fixed!(
        "wizard",
        Category::Wizards,
        "Run a setup wizard (complete, microservices, ai, observability)",
        &[ArgSpec::required("name"), CTX_NAMESPACE],
    ),
    fixed!(
        "create-ingress",
        Category::Ingress,
        "Route a host to a service",
        INGRESS_ARGS,
    ),
    fixed!(
        "create-tls-ingress",
        Category::Ingress,
        "Route a host to a service over TLS with a self-signed certificate",
        INGRESS_ARGS,
    ),
    fixed!(
        "delete-ingress",
        Category::Ingress,
        "Delete an ingress",
        &[ArgSpec::required("name"), NAMESPACE],
    ),
    fixed!(
        "list-ingress",
        Category::Ingress,
        "List ingresses",
        &[NAMESPACE],
    ),
    fixed!(
        "describe-ingress",
        Category::Ingress,
        "Describe an ingress",
        &[ArgSpec::required("name"), NAMESPACE],
    ),
    fixed!(
        "test-ingress",
        Category::Ingress,
        "Request a host through the ingress controller",
        &[ArgSpec::required("host"), ArgSpec::optional("path", "/")],
    ),
    fixed!(
        "generate-manifests",
        Category::Manifests,
        "Write starter manifests to manifests-<app>/",
        &[
            ArgSpec::required("app"),
            NAMESPACE,
            ArgSpec::contextual("host"),
        ],
    ),
    fixed!(
        "backup-namespace",
        Category::Backup,
        "Export a namespace's resources as YAML",
        &[ArgSpec::required("namespace")],
    ),
    fixed!(
        "backup",
        Category::Backup,
        "Export cluster-scoped resources and every namespace",
        &[],
    ),
    fixed!(
        "monitor",
        Category::Monitoring,
        "Poll pods, nodes and events until 'q' is entered",
        &[NAMESPACE, ArgSpec::optional("interval-seconds", "5")],
    ),
    fixed!("help", Category::Help, "Show usage", &[]),
    fixed!("menu", Category::Help, "Open the interactive menu", &[]),
];

const DEPLOY_COMPONENT_ARGS: &[ArgSpec] = &[CTX_NAMESPACE];

/// What a verb resolves to before argument conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerbTarget {
    Fixed,
    Component(String),
    Environment(String),
    Feature(Feature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbEntry {
    pub verb: String,
    pub category: Category,
    pub summary: String,
    pub args: &'static [ArgSpec],
    pub target: VerbTarget,
}

impl VerbEntry {
    pub fn usage(&self) -> String {
        let mut line = self.verb.clone();
        for arg in self.args {
            line.push(' ');
            line.push_str(&arg.usage());
        }
        line
    }
}

/// A verb with its arguments bound to named slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub request_id: RequestId,
    pub verb: String,
    pub target: VerbTarget,
    /// Slot name to value, in declaration order; `None` for unresolved contextual slots
    pub args: Vec<(&'static str, Option<String>)>,
    /// Words bound to the variadic slot, argument boundaries intact
    pub rest: Vec<String>,
}

impl InvocationRequest {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(slot, _)| *slot == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// # Errors
    ///
    /// `MissingArgument` naming the slot and its 1-based position.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| KdevError::MissingArgument {
            verb: self.verb.clone(),
            argument: name.to_string(),
            position: self
                .args
                .iter()
                .position(|(slot, _)| *slot == name)
                .map_or(0, |i| i + 1),
        })
    }
}

pub struct Router<'c> {
    catalog: &'c Catalog,
    verbs: Vec<VerbEntry>,
}

impl<'c> Router<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        let mut verbs: Vec<VerbEntry> = FIXED_VERBS
            .iter()
            .map(|f| VerbEntry {
                verb: f.verb.to_string(),
                category: f.category,
                summary: f.summary.to_string(),
                args: f.args,
                target: VerbTarget::Fixed,
            })
            .collect();

        verbs.extend(catalog.components().iter().map(|c| VerbEntry {
            verb: c.verb(),
            category: Category::Components,
            summary: format!("Deploy {}", c.description),
            args: DEPLOY_COMPONENT_ARGS,
            target: VerbTarget::Component(c.key.to_string()),
        }));
        verbs.extend(catalog.environments().iter().map(|e| VerbEntry {
            verb: e.verb.clone(),
            category: Category::Environments,
            summary: format!("{} ({})", e.description, e.components.join(", ")),
            args: DEPLOY_COMPONENT_ARGS,
            target: VerbTarget::Environment(e.name.clone()),
        }));
        verbs.extend(Feature::ALL.iter().map(|f| VerbEntry {
            verb: f.verb(),
            category: Category::Features,
            summary: f.description().to_string(),
            args: &[],
            target: VerbTarget::Feature(*f),
        }));

        // stable sort keeps table order within a category
        verbs.sort_by_key(|v| v.category);
        Self { catalog, verbs }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn verbs(&self) -> &[VerbEntry] {
        &self.verbs
    }

    pub fn verbs_in(&self, category: Category) -> impl Iterator<Item = &VerbEntry> {
        self.verbs.iter().filter(move |v| v.category == category)
    }

    pub fn lookup(&self, verb: &str) -> Option<&VerbEntry> {
        self.verbs.iter().find(|v| v.verb == verb)
    }

    /// Bind arguments to the verb's slots
    ///
    /// # Errors
    ///
    /// `UnknownCommand`, `MissingArgument` for the first absent required
    /// slot, `InvalidArgument` for surplus arguments.
    pub fn parse(&self, verb: &str, args: &[String]) -> Result<InvocationRequest> {
        let entry = self.lookup(verb).ok_or_else(|| KdevError::UnknownCommand {
            verb: verb.to_string(),
        })?;

        let variadic = entry.args.last().is_some_and(|a| a.variadic);
        if !variadic && args.len() > entry.args.len() {
            return Err(KdevError::InvalidArgument {
                verb: verb.to_string(),
                argument: args[entry.args.len()].clone(),
                reason: format!(
                    "unexpected extra argument (usage: {})",
                    entry.usage()
                ),
            });
        }

        let mut bound = Vec::with_capacity(entry.args.len());
        let mut rest = Vec::new();
        for (i, spec) in entry.args.iter().enumerate() {
            let supplied = if spec.variadic && args.len() > i {
                rest = args[i..].to_vec();
                Some(rest.join(" "))
            } else {
                args.get(i).cloned()
            };
            let value = match (supplied, spec.default) {
                (Some(v), _) => Some(v),
                (None, ArgDefault::Value(d)) => {
                    if spec.variadic {
                        rest = d.split_whitespace().map(str::to_string).collect();
                    }
                    Some(d.to_string())
                }
                (None, ArgDefault::Contextual) => None,
                (None, ArgDefault::Required) => {
                    return Err(KdevError::MissingArgument {
                        verb: verb.to_string(),
                        argument: spec.name.to_string(),
                        position: i + 1,
                    })
                }
            };
            bound.push((spec.name, value));
        }

        Ok(InvocationRequest {
            request_id: RequestId::new(),
            verb: verb.to_string(),
            target: entry.target.clone(),
            args: bound,
            rest,
        })
    }

    /// Parse and convert to a typed command
    ///
    /// # Errors
    ///
    /// Any parse error, plus conversion errors from [`Command::from_invocation`].
    pub fn route(&self, verb: &str, args: &[String]) -> Result<(InvocationRequest, Command)> {
        let request = self.parse(verb, args)?;
        let command = Command::from_invocation(&request, self.catalog)?;
        tracing::debug!(
            request_id = %request.request_id,
            verb = %request.verb,
            command = command.op_name(),
            "resolved command"
        );
        Ok((request, command))
    }

    /// Usage text listing every verb by category
    pub fn usage(&self) -> String {
        let mut out = String::from(
            "Usage: kdev [--config <FILE>] [--dry-run] [--verbose] [--log-json] [<verb> [args...]]\n\
             Run without a verb for the interactive menu.\n",
        );
        let width = self.verbs.iter().map(|v| v.usage().len()).max().unwrap_or(0);
        for category in Category::ALL {
            let mut entries = self.verbs_in(category).peekable();
            if entries.peek().is_none() {
                continue;
            }
            let _ = writeln!(out, "\n{}:", category.title());
            for entry in entries {
                let _ = writeln!(out, "  {:width$}  {}", entry.usage(), entry.summary, width = width);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_verbs_are_unique() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let mut seen = std::collections::HashSet::new();
        for v in router.verbs() {
            assert!(seen.insert(v.verb.clone()), "duplicate verb {}", v.verb);
        }
        assert!(router.lookup("deploy-redis").is_some());
        assert!(router.lookup("create-vector-env").is_some());
        assert!(router.lookup("enable-istio").is_some());
    }

    #[test]
    fn test_unknown_verb() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let err = router.parse("deploy-kafkaa", &[]).unwrap_err();
        assert_eq!(
            err,
            KdevError::UnknownCommand {
                verb: "deploy-kafkaa".to_string()
            }
        );
    }

    #[test]
    fn test_missing_argument_reports_position() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let err = router.parse("scale", &args(&["web"])).unwrap_err();
        assert_eq!(
            err,
            KdevError::MissingArgument {
                verb: "scale".to_string(),
                argument: "replicas".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn test_defaults_applied() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let req = router.parse("create-ingress", &args(&["foo", "foo.local", "svc:80"])).unwrap();
        assert_eq!(req.get("namespace"), Some("default"));
        assert_eq!(req.get("path"), Some("/"));

        let req = router.parse("deploy-redis", &[]).unwrap();
        assert_eq!(req.get("namespace"), None);
        assert_eq!(req.target, VerbTarget::Component("redis".to_string()));
    }

    #[test]
    fn test_surplus_arguments_rejected() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let err = router.parse("status", &args(&["now"])).unwrap_err();
        assert!(matches!(err, KdevError::InvalidArgument { ref argument, .. } if argument == "now"));
    }

    #[test]
    fn test_exec_command_is_variadic() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let req = router
            .parse("exec", &args(&["web-0", "dev", "ls", "-la", "/tmp"]))
            .unwrap();
        assert_eq!(req.get("command"), Some("ls -la /tmp"));
        assert_eq!(req.rest, args(&["ls", "-la", "/tmp"]));

        let req = router.parse("exec", &args(&["web-0"])).unwrap();
        assert_eq!(req.get("command"), Some("/bin/sh"));
        assert_eq!(req.rest, args(&["/bin/sh"]));
    }

    #[test]
    fn test_exec_keeps_quoted_argument_whole() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let req = router
            .parse("exec", &args(&["web-0", "dev", "sh", "-c", "echo a b"]))
            .unwrap();
        assert_eq!(req.rest, args(&["sh", "-c", "echo a b"]));
    }

    #[test]
    fn test_require_names_position() {
        let req = InvocationRequest {
            request_id: RequestId::new(),
            verb: "wizard".to_string(),
            target: VerbTarget::Fixed,
            args: vec![("name", Some("ai".to_string())), ("namespace", None)],
            rest: Vec::new(),
        };
        assert_eq!(req.require("name").unwrap(), "ai");
        assert!(matches!(
            req.require("namespace"),
            Err(KdevError::MissingArgument { position: 2, .. })
        ));
    }

    #[test]
    fn test_usage_lists_every_category() {
        let catalog = Catalog::builtin().unwrap();
        let router = Router::new(&catalog);
        let usage = router.usage();
        for category in Category::ALL {
            assert!(usage.contains(category.title()), "{}", category.title());
        }
        assert!(usage.contains("scale <deployment> <replicas> [namespace]"));
    }
}
