//! Ingress resource rendering

use crate::errors::Result;
use crate::render::{fill_builtin, values};

const INGRESS_TEMPLATE: &str = include_str!("../../templates/ingress.yaml");
const TLS_INGRESS_TEMPLATE: &str = include_str!("../../templates/ingress-tls.yaml");

/// Host-based route to one service port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressSpec {
    pub name: String,
    pub host: String,
    pub service: String,
    pub port: u16,
    pub namespace: String,
    /// Always starts with `/`
    pub path: String,
}

impl IngressSpec {
    /// Name of the TLS secret a TLS ingress refers to
    pub fn tls_secret_name(&self) -> String {
        format!("{}-tls", self.name)
    }

    fn values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("namespace", self.namespace.clone()),
            ("host", self.host.clone()),
            ("path", self.path.clone()),
            ("service", self.service.clone()),
            ("port", self.port.to_string()),
        ]
    }
}

/// # Errors
///
/// Only if the built-in template is malformed.
pub fn render_ingress(spec: &IngressSpec) -> Result<String> {
    fill_builtin("ingress", INGRESS_TEMPLATE, &values(spec.values()))
}

/// # Errors
///
/// Only if the built-in template is malformed.
pub fn render_tls_ingress(spec: &IngressSpec) -> Result<String> {
    let mut pairs = spec.values();
    pairs.push(("tls_secret", spec.tls_secret_name()));
    fill_builtin("ingress-tls", TLS_INGRESS_TEMPLATE, &values(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> IngressSpec {
        IngressSpec {
            name: "foo".to_string(),
            host: "foo.local".to_string(),
            service: "svc".to_string(),
            port: 80,
            namespace: "ns".to_string(),
            path: "/".to_string(),
        }
    }

    #[test]
    fn test_render_ingress_fields() {
        let body = render_ingress(&spec()).unwrap();
        assert!(body.contains("name: foo\n"));
        assert!(body.contains("namespace: ns\n"));
        assert!(body.contains("host: foo.local"));
        assert!(body.contains("name: svc"));
        assert!(body.contains("number: 80"));
        assert!(body.contains("path: /\n"));
    }

    #[test]
    fn test_render_tls_ingress_refers_to_secret() {
        let body = render_tls_ingress(&spec()).unwrap();
        assert!(body.contains("secretName: foo-tls"));
        assert!(body.contains("- foo.local"));
        assert!(!body.contains("{{"));
    }
}
