//! Environments and wizards
//!
//! An environment is an ordered bundle of components sharing one namespace,
//! with optional feature toggles run after its members. A wizard is an
//! ordered mix of environment expansions and feature toggles.

use crate::features::Feature;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSpec {
    pub name: String,
    pub verb: String,
    pub description: String,
    pub namespace: String,
    /// Component keys in submission order
    pub components: Vec<String>,
    pub features: Vec<Feature>,
}

impl EnvironmentSpec {
    /// Environment with the conventional `create-<name>-env` verb
    pub fn new<I, S>(name: &str, namespace: &str, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            verb: format!("create-{}-env", name),
            description: String::new(),
            namespace: namespace.to_string(),
            components: components.into_iter().map(Into::into).collect(),
            features: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    Environment(String),
    Feature(Feature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSpec {
    pub name: String,
    pub description: String,
    pub steps: Vec<WizardStep>,
}

impl WizardSpec {
    pub fn new(name: &str, description: &str, steps: Vec<WizardStep>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            steps,
        }
    }
}

pub fn builtin_environments() -> Vec<EnvironmentSpec> {
    vec![
        EnvironmentSpec::new("dev", "development", ["postgres", "redis", "nginx"])
            .with_description("General development stack: database, cache, web server"),
        EnvironmentSpec::new(
            "database",
            "databases",
            ["postgres", "mysql", "mongodb", "redis"],
        )
        .with_description("Relational, document and key-value stores"),
        // zookeeper must be submitted before the broker that connects to it
        EnvironmentSpec::new("messaging", "messaging", ["zookeeper", "kafka", "rabbitmq"])
            .with_description("Kafka with ZooKeeper, plus RabbitMQ"),
        EnvironmentSpec::new("vector", "vector-db", ["qdrant", "weaviate", "chromadb"])
            .with_description("Vector databases for embedding workloads"),
        EnvironmentSpec::new("logging", "logging", ["elasticsearch", "kibana"])
            .with_description("Elasticsearch with Kibana"),
    ]
}

pub fn builtin_wizards() -> Vec<WizardSpec> {
    use WizardStep::{Environment as Env, Feature as Toggle};

    vec![
        WizardSpec::new(
            "complete",
            "Complete development setup",
            vec![
                Env("dev".to_string()),
                Env("database".to_string()),
                Env("messaging".to_string()),
                Toggle(Feature::Ingress),
                Toggle(Feature::Dashboard),
                Toggle(Feature::Monitoring),
            ],
        ),
        WizardSpec::new(
            "microservices",
            "Messaging and databases behind an Istio mesh",
            vec![
                Env("messaging".to_string()),
                Env("database".to_string()),
                Toggle(Feature::Ingress),
                Toggle(Feature::Istio),
            ],
        ),
        WizardSpec::new(
            "ai",
            "Vector stores with a relational database",
            vec![
                Env("vector".to_string()),
                Env("database".to_string()),
                Toggle(Feature::Ingress),
            ],
        ),
        WizardSpec::new(
            "observability",
            "Log search plus cluster monitoring",
            vec![
                Env("logging".to_string()),
                Toggle(Feature::Monitoring),
                Toggle(Feature::Dashboard),
            ],
        ),
    ]
}
