//! Deployable component definitions
//!
//! A component is one third-party service packaged as a manifest template.
//! Every template implicitly takes `namespace` and `name`; the remaining
//! parameters are declared per component with their development defaults.

/// Parameter names every component template accepts
pub const IMPLICIT_PARAMS: [&str; 2] = ["namespace", "name"];

/// One declared template parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    /// `None` makes the parameter required
    pub default: Option<&'static str>,
    /// Credentials are redacted in logs
    pub sensitive: bool,
}

impl ParamSpec {
    pub const fn with_default(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: Some(default),
            sensitive: false,
        }
    }

    pub const fn secret(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: Some(default),
            sensitive: true,
        }
    }

    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            sensitive: false,
        }
    }
}

/// An immutable component definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub key: &'static str,
    pub description: &'static str,
    pub default_namespace: &'static str,
    pub params: Vec<ParamSpec>,
    pub template: &'static str,
}

impl ComponentSpec {
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether `name` may be supplied when rendering this component
    pub fn accepts(&self, name: &str) -> bool {
        IMPLICIT_PARAMS.contains(&name) || self.param(name).is_some()
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.param(name).map(|p| p.sensitive).unwrap_or(false)
    }

    /// Deploy verb for this component
    pub fn verb(&self) -> String {
        format!("deploy-{}", self.key)
    }
}

const DEV_NS: &str = "development";

fn spec(
    key: &'static str,
    description: &'static str,
    params: Vec<ParamSpec>,
    template: &'static str,
) -> ComponentSpec {
    ComponentSpec {
        key,
        description,
        default_namespace: DEV_NS,
        params,
        template,
    }
}

/// The built-in component table, in menu order
pub fn builtin_components() -> Vec<ComponentSpec> {
    use ParamSpec as P;

    vec![
        // Databases and caches
        spec(
            "postgres",
            "PostgreSQL 15 database",
            vec![
                P::with_default("user", "devuser"),
                P::secret("password", "devpassword"),
                P::with_default("database", "devdb"),
                P::with_default("storage", "1Gi"),
            ],
            include_str!("../../templates/postgres.yaml"),
        ),
        spec(
            "mysql",
            "MySQL 8.0 database",
            vec![
                P::secret("root_password", "rootpassword"),
                P::with_default("user", "devuser"),
                P::secret("password", "devpassword"),
                P::with_default("database", "devdb"),
                P::with_default("storage", "1Gi"),
            ],
            include_str!("../../templates/mysql.yaml"),
        ),
        spec(
            "mongodb",
            "MongoDB 7.0 document store",
            vec![
                P::with_default("user", "admin"),
                P::secret("password", "devpassword"),
                P::with_default("storage", "1Gi"),
            ],
            include_str!("../../templates/mongodb.yaml"),
        ),
        spec(
            "redis",
            "Redis 7 in-memory store",
            vec![
                P::secret("password", "devpassword"),
                P::with_default("maxmemory", "256mb"),
            ],
            include_str!("../../templates/redis.yaml"),
        ),
        spec(
            "cassandra",
            "Apache Cassandra 4.1 (single node)",
            vec![
                P::with_default("cluster_name", "dev-cluster"),
                P::with_default("max_heap", "512M"),
            ],
            include_str!("../../templates/cassandra.yaml"),
        ),
        spec(
            "memcached",
            "Memcached 1.6",
            vec![P::with_default("memory_mb", "128")],
            include_str!("../../templates/memcached.yaml"),
        ),
        // Messaging
        spec(
            "zookeeper",
            "ZooKeeper coordination service for Kafka",
            vec![],
            include_str!("../../templates/zookeeper.yaml"),
        ),
        spec(
            "kafka",
            "Apache Kafka broker (needs zookeeper)",
            vec![P::with_default("zookeeper_connect", "zookeeper:2181")],
            include_str!("../../templates/kafka.yaml"),
        ),
        spec(
            "rabbitmq",
            "RabbitMQ with management UI",
            vec![
                P::with_default("user", "devuser"),
                P::secret("password", "devpassword"),
            ],
            include_str!("../../templates/rabbitmq.yaml"),
        ),
        spec(
            "nats",
            "NATS with JetStream",
            vec![],
            include_str!("../../templates/nats.yaml"),
        ),
        // Search and logging
        spec(
            "elasticsearch",
            "Elasticsearch 8.11 (single node, security off)",
            vec![P::with_default("java_opts", "-Xms512m -Xmx512m")],
            include_str!("../../templates/elasticsearch.yaml"),
        ),
        spec(
            "kibana",
            "Kibana 8.11",
            vec![P::with_default(
                "elasticsearch_url",
                "http://elasticsearch:9200",
            )],
            include_str!("../../templates/kibana.yaml"),
        ),
        // Storage and web
        spec(
            "minio",
            "MinIO S3-compatible object storage",
            vec![
                P::with_default("access_key", "minioadmin"),
                P::secret("secret_key", "minioadmin"),
                P::with_default("storage", "5Gi"),
            ],
            include_str!("../../templates/minio.yaml"),
        ),
        spec(
            "nginx",
            "NGINX web server",
            vec![
                P::with_default("replicas", "1"),
                P::with_default("service_type", "ClusterIP"),
            ],
            include_str!("../../templates/nginx.yaml"),
        ),
        // Observability
        spec(
            "prometheus",
            "Prometheus server",
            vec![P::with_default("scrape_interval", "15s")],
            include_str!("../../templates/prometheus.yaml"),
        ),
        spec(
            "grafana",
            "Grafana dashboards",
            vec![
                P::with_default("admin_user", "admin"),
                P::secret("admin_password", "admin"),
            ],
            include_str!("../../templates/grafana.yaml"),
        ),
        spec(
            "jaeger",
            "Jaeger all-in-one tracing",
            vec![],
            include_str!("../../templates/jaeger.yaml"),
        ),
        // Vector databases
        spec(
            "qdrant",
            "Qdrant vector database",
            vec![P::with_default("storage", "2Gi")],
            include_str!("../../templates/qdrant.yaml"),
        ),
        spec(
            "weaviate",
            "Weaviate vector database",
            vec![P::with_default("vectorizer", "none")],
            include_str!("../../templates/weaviate.yaml"),
        ),
        spec(
            "chromadb",
            "Chroma vector database",
            vec![],
            include_str!("../../templates/chromadb.yaml"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::template::placeholders;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_keys_are_unique() {
        let components = builtin_components();
        let keys: HashSet<_> = components.iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), components.len());
        assert_eq!(components.len(), 20);
    }

    #[test]
    fn test_declared_params_match_template_placeholders() {
        for component in builtin_components() {
            let used = placeholders(component.template).unwrap();
            for name in &used {
                assert!(
                    component.accepts(name),
                    "{} uses undeclared placeholder {}",
                    component.key,
                    name
                );
            }
            for param in &component.params {
                assert!(
                    used.iter().any(|u| u == param.name),
                    "{} declares unused parameter {}",
                    component.key,
                    param.name
                );
            }
        }
    }

    #[test]
    fn test_credentials_are_marked_sensitive() {
        let components = builtin_components();
        let postgres = components.iter().find(|c| c.key == "postgres").unwrap();
        assert!(postgres.is_sensitive("password"));
        assert!(!postgres.is_sensitive("user"));
        assert!(!postgres.is_sensitive("namespace"));
        assert_eq!(postgres.verb(), "deploy-postgres");
    }
}
