//! Component manifest rendering
//!
//! Parameter resolution, highest precedence first: explicit values, the
//! defaults registry, the component's declared defaults. `namespace` and
//! `name` default to the registry namespace and the component key.

use crate::catalog::Catalog;
use crate::errors::{KdevError, Result};
use crate::render::template::{self, TemplateError};
use std::collections::BTreeMap;

/// A manifest ready for `kubectl apply -f -`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifest {
    pub component: String,
    pub namespace: String,
    pub name: String,
    pub body: String,
}

/// Render one component
///
/// `namespace` wins over a `namespace` entry in `overrides`.
///
/// # Errors
///
/// `UnknownComponent` for an unregistered key, `InvalidParameter` for a
/// parameter the component does not declare or a required parameter with
/// no value.
pub fn render_component(
    catalog: &Catalog,
    key: &str,
    namespace: Option<&str>,
    overrides: &BTreeMap<String, String>,
) -> Result<RenderedManifest> {
    let spec = catalog.component(key)?;

    if let Some(param) = overrides.keys().find(|p| !spec.accepts(p)) {
        return Err(KdevError::InvalidParameter {
            component: key.to_string(),
            param: param.clone(),
            reason: "not declared by this component".to_string(),
        });
    }

    let mut values: BTreeMap<String, String> = spec
        .params
        .iter()
        .filter_map(|p| p.default.map(|d| (p.name.to_string(), d.to_string())))
        .collect();

    let registry = catalog.defaults().get(key);
    if let Some(entry) = registry {
        values.extend(entry.params.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    values.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

    let namespace = match namespace {
        Some(ns) => ns.to_string(),
        None => values
            .get("namespace")
            .cloned()
            .or_else(|| registry.map(|e| e.namespace.clone()))
            .unwrap_or_else(|| spec.default_namespace.to_string()),
    };
    let name = values
        .get("name")
        .cloned()
        .unwrap_or_else(|| key.to_string());
    values.insert("namespace".to_string(), namespace.clone());
    values.insert("name".to_string(), name.clone());

    if let Some(missing) = spec.params.iter().find(|p| !values.contains_key(p.name)) {
        return Err(KdevError::InvalidParameter {
            component: key.to_string(),
            param: missing.name.to_string(),
            reason: "required and has no default".to_string(),
        });
    }

    let body = template::substitute(spec.template, &values).map_err(|e| match e {
        TemplateError::Unresolved { name } => KdevError::InvalidParameter {
            component: key.to_string(),
            param: name,
            reason: "template placeholder has no value".to_string(),
        },
        other => KdevError::InvalidCatalog {
            reason: format!("template for '{}': {}", key, other),
        },
    })?;

    tracing::debug!(component_key = key, namespace = %namespace, bytes = body.len(), "rendered");

    Ok(RenderedManifest {
        component: key.to_string(),
        namespace,
        name,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComponentSpec, ParamSpec};

    fn no_overrides() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn test_render_with_defaults() {
        let catalog = Catalog::builtin().unwrap();
        let m = render_component(&catalog, "postgres", None, &no_overrides()).unwrap();
        assert_eq!(m.namespace, "development");
        assert_eq!(m.name, "postgres");
        assert!(m.body.contains("namespace: development"));
        assert!(m.body.contains("devuser"));
        assert!(m.body.contains("devdb"));
        assert!(!m.body.contains("{{"));
    }

    #[test]
    fn test_explicit_namespace_wins() {
        let catalog = Catalog::builtin().unwrap();
        let m = render_component(&catalog, "redis", Some("cache"), &no_overrides()).unwrap();
        assert_eq!(m.namespace, "cache");
        assert!(m.body.contains("namespace: cache"));
    }

    #[test]
    fn test_registry_overrides_declared_default() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog
            .defaults_mut()
            .set_param("redis", "maxmemory", "2gb")
            .unwrap();
        catalog.defaults_mut().set_namespace("redis", "cache").unwrap();

        let m = render_component(&catalog, "redis", None, &no_overrides()).unwrap();
        assert_eq!(m.namespace, "cache");
        assert!(m.body.contains("2gb"));
    }

    #[test]
    fn test_explicit_value_overrides_registry() {
        let catalog = Catalog::builtin().unwrap();
        let overrides: BTreeMap<_, _> = [("name".to_string(), "pg-main".to_string())]
            .into_iter()
            .collect();
        let m = render_component(&catalog, "postgres", None, &overrides).unwrap();
        assert_eq!(m.name, "pg-main");
        assert!(m.body.contains("name: pg-main"));
    }

    #[test]
    fn test_unknown_component() {
        let catalog = Catalog::builtin().unwrap();
        let err = render_component(&catalog, "kafkaa", None, &no_overrides()).unwrap_err();
        assert_eq!(
            err,
            KdevError::UnknownComponent {
                key: "kafkaa".to_string()
            }
        );
    }

    #[test]
    fn test_undeclared_param_rejected() {
        let catalog = Catalog::builtin().unwrap();
        let overrides: BTreeMap<_, _> = [("password".to_string(), "x".to_string())]
            .into_iter()
            .collect();
        let err = render_component(&catalog, "nats", None, &overrides).unwrap_err();
        assert!(matches!(err, KdevError::InvalidParameter { ref param, .. } if param == "password"));
    }

    #[test]
    fn test_required_param_without_value() {
        let custom = ComponentSpec {
            key: "custom",
            description: "",
            default_namespace: "default",
            params: vec![ParamSpec::required("token")],
            template: "name: {{name}}\ntoken: {{token}}\n",
        };
        let catalog = Catalog::new(vec![custom], vec![], vec![]).unwrap();
        let err = render_component(&catalog, "custom", None, &no_overrides()).unwrap_err();
        assert_eq!(
            err,
            KdevError::InvalidParameter {
                component: "custom".to_string(),
                param: "token".to_string(),
                reason: "required and has no default".to_string(),
            }
        );

        let overrides: BTreeMap<_, _> = [("token".to_string(), "abc".to_string())]
            .into_iter()
            .collect();
        let m = render_component(&catalog, "custom", None, &overrides).unwrap();
        assert_eq!(m.body, "name: custom\ntoken: abc\n");
    }
}
