//! Injectable default-parameter registry
//!
//! Built from the component table, then optionally overridden from
//! configuration. Rendering reads defaults from here, never from the
//! component table directly, so tests and `kdev.toml` can swap credentials,
//! namespaces and sizes deterministically.

use crate::catalog::component::ComponentSpec;
use crate::config::ComponentOverride;
use crate::errors::{KdevError, Result};
use kdev_core_types::Sensitive;
use std::collections::BTreeMap;

/// Default namespace and parameter values for one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefaults {
    pub namespace: String,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsRegistry {
    entries: BTreeMap<String, ComponentDefaults>,
}

impl DefaultsRegistry {
    /// Seed the registry from the defaults declared on each component
    pub fn from_specs(specs: &[ComponentSpec]) -> Self {
        let entries = specs
            .iter()
            .map(|spec| {
                let params = spec
                    .params
                    .iter()
                    .filter_map(|p| p.default.map(|d| (p.name.to_string(), d.to_string())))
                    .collect();
                (
                    spec.key.to_string(),
                    ComponentDefaults {
                        namespace: spec.default_namespace.to_string(),
                        params,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&ComponentDefaults> {
        self.entries.get(key)
    }

    /// Replace one default value
    ///
    /// # Errors
    ///
    /// `UnknownComponent` if the key is not registered.
    pub fn set_param(&mut self, key: &str, param: &str, value: impl Into<String>) -> Result<()> {
        let entry = self.entry_mut(key)?;
        entry.params.insert(param.to_string(), value.into());
        Ok(())
    }

    /// # Errors
    ///
    /// `UnknownComponent` if the key is not registered.
    pub fn set_namespace(&mut self, key: &str, namespace: impl Into<String>) -> Result<()> {
        self.entry_mut(key)?.namespace = namespace.into();
        Ok(())
    }

    /// Apply `[components.<key>]` sections from configuration
    ///
    /// # Errors
    ///
    /// `Config` when a section names an unknown component or a parameter
    /// the component does not declare.
    pub fn apply_overrides(
        &mut self,
        specs: &[ComponentSpec],
        overrides: &BTreeMap<String, ComponentOverride>,
    ) -> Result<()> {
        for (key, over) in overrides {
            let spec = specs
                .iter()
                .find(|s| s.key == key.as_str())
                .ok_or_else(|| KdevError::Config {
                    reason: format!("[components.{}] names an unknown component", key),
                })?;

            if let Some(ns) = &over.namespace {
                self.set_namespace(key, ns.clone())?;
            }
            for (param, value) in &over.params {
                if spec.param(param).is_none() {
                    return Err(KdevError::Config {
                        reason: format!(
                            "[components.{}] sets '{}', which {} does not declare",
                            key, param, key
                        ),
                    });
                }
                if spec.is_sensitive(param) {
                    tracing::debug!(component_key = %key, param = %param, value = %Sensitive::new(value), "override");
                } else {
                    tracing::debug!(component_key = %key, param = %param, value = %value, "override");
                }
                self.set_param(key, param, value.clone())?;
            }
        }
        Ok(())
    }

    fn entry_mut(&mut self, key: &str) -> Result<&mut ComponentDefaults> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| KdevError::UnknownComponent {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::component::builtin_components;

    #[test]
    fn test_seeded_from_component_table() {
        let registry = DefaultsRegistry::from_specs(&builtin_components());
        let pg = registry.get("postgres").unwrap();
        assert_eq!(pg.namespace, "development");
        assert_eq!(pg.params["user"], "devuser");
        assert_eq!(pg.params["password"], "devpassword");
        assert_eq!(pg.params["database"], "devdb");

        let mysql = registry.get("mysql").unwrap();
        assert_eq!(mysql.params["user"], "devuser");
        assert_eq!(mysql.params["root_password"], "rootpassword");
    }

    #[test]
    fn test_overrides_replace_values() {
        let specs = builtin_components();
        let mut registry = DefaultsRegistry::from_specs(&specs);
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "redis".to_string(),
            ComponentOverride {
                namespace: Some("cache".to_string()),
                params: [("maxmemory".to_string(), "1gb".to_string())]
                    .into_iter()
                    .collect(),
            },
        );

        registry.apply_overrides(&specs, &overrides).unwrap();
        let redis = registry.get("redis").unwrap();
        assert_eq!(redis.namespace, "cache");
        assert_eq!(redis.params["maxmemory"], "1gb");
        assert_eq!(redis.params["password"], "devpassword");
    }

    #[test]
    fn test_override_of_unknown_component_rejected() {
        let specs = builtin_components();
        let mut registry = DefaultsRegistry::from_specs(&specs);
        let mut overrides = BTreeMap::new();
        overrides.insert("oracle".to_string(), ComponentOverride::default());

        let err = registry.apply_overrides(&specs, &overrides).unwrap_err();
        assert!(matches!(err, KdevError::Config { .. }));
    }

    #[test]
    fn test_override_of_undeclared_param_rejected() {
        let specs = builtin_components();
        let mut registry = DefaultsRegistry::from_specs(&specs);
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "nats".to_string(),
            ComponentOverride {
                namespace: None,
                params: [("password".to_string(), "x".to_string())]
                    .into_iter()
                    .collect(),
            },
        );

        let err = registry.apply_overrides(&specs, &overrides).unwrap_err();
        assert!(err.to_string().contains("does not declare"));
    }

    #[test]
    fn test_set_param_on_unknown_component() {
        let mut registry = DefaultsRegistry::default();
        let err = registry.set_param("redis", "password", "x").unwrap_err();
        assert_eq!(
            err,
            KdevError::UnknownComponent {
                key: "redis".to_string()
            }
        );
    }
}
