//! `generate-manifests` scaffold
//!
//! Six starter manifests for an application, plus an ingress when a host is
//! given. Nothing is applied; the files are written by the engine.

use crate::errors::Result;
use crate::render::{fill_builtin, values};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Files always generated, in write order
pub const SCAFFOLD_FILES: [&str; 6] = [
    "deployment.yaml",
    "service.yaml",
    "configmap.yaml",
    "secret.yaml",
    "hpa.yaml",
    "pvc.yaml",
];

/// Only part of the scaffold when a host is given
pub const INGRESS_FILE: &str = "ingress.yaml";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STORAGE: &str = "1Gi";
const PLACEHOLDER_DB_PASSWORD: &str = "changeme";
const PLACEHOLDER_API_KEY: &str = "changeme-api-key";

fn template_for(file: &str) -> Option<&'static str> {
    match file {
        "deployment.yaml" => Some(include_str!("../../templates/scaffold/deployment.yaml")),
        "service.yaml" => Some(include_str!("../../templates/scaffold/service.yaml")),
        "configmap.yaml" => Some(include_str!("../../templates/scaffold/configmap.yaml")),
        "secret.yaml" => Some(include_str!("../../templates/scaffold/secret.yaml")),
        "hpa.yaml" => Some(include_str!("../../templates/scaffold/hpa.yaml")),
        "pvc.yaml" => Some(include_str!("../../templates/scaffold/pvc.yaml")),
        INGRESS_FILE => Some(include_str!("../../templates/scaffold/ingress.yaml")),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub file_name: &'static str,
    pub body: String,
}

/// Render the scaffold for `app` in `namespace`
///
/// # Errors
///
/// Only if a built-in template is malformed.
pub fn render_scaffold(app: &str, namespace: &str, host: Option<&str>) -> Result<Vec<ScaffoldFile>> {
    let vals = values([
        ("app", app.to_string()),
        ("namespace", namespace.to_string()),
        ("image", format!("{}:latest", app)),
        ("port", DEFAULT_PORT.to_string()),
        ("storage", DEFAULT_STORAGE.to_string()),
        ("database_password_b64", STANDARD.encode(PLACEHOLDER_DB_PASSWORD)),
        ("api_key_b64", STANDARD.encode(PLACEHOLDER_API_KEY)),
        ("host", host.unwrap_or_default().to_string()),
    ]);

    let mut names: Vec<&'static str> = SCAFFOLD_FILES.to_vec();
    if host.is_some() {
        names.push(INGRESS_FILE);
    }

    names
        .into_iter()
        .filter_map(|name| template_for(name).map(|source| (name, source)))
        .map(|(file_name, source)| {
            Ok(ScaffoldFile {
                file_name,
                body: fill_builtin(file_name, source, &vals)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_files_without_host() {
        let files = render_scaffold("myapp", "dev", None).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name).collect();
        assert_eq!(names, SCAFFOLD_FILES.to_vec());
        for file in &files {
            assert!(file.body.contains("namespace: dev"), "{}", file.file_name);
            assert!(file.body.contains("myapp"), "{}", file.file_name);
        }
    }

    #[test]
    fn test_ingress_added_with_host() {
        let files = render_scaffold("myapp", "dev", Some("myapp.local")).unwrap();
        assert_eq!(files.len(), 7);
        let ingress = files.last().unwrap();
        assert_eq!(ingress.file_name, "ingress.yaml");
        assert!(ingress.body.contains("host: myapp.local"));
    }

    #[test]
    fn test_secret_values_are_base64() {
        let files = render_scaffold("myapp", "dev", None).unwrap();
        let secret = files.iter().find(|f| f.file_name == "secret.yaml").unwrap();
        assert!(secret.body.contains(&STANDARD.encode("changeme")));
        assert!(!secret.body.contains("DATABASE_PASSWORD: changeme\n"));
    }

    #[test]
    fn test_deployment_uses_app_image() {
        let files = render_scaffold("shop", "prod", None).unwrap();
        assert!(files[0].body.contains("image: shop:latest"));
        assert!(files[0].body.contains("containerPort: 8080"));
    }
}
