//! Component, environment and wizard catalog
//!
//! Built once at startup: the built-in tables, validated, with configuration
//! overrides applied to the defaults registry.

pub mod component;
pub mod defaults;
pub mod environment;

pub use component::{builtin_components, ComponentSpec, ParamSpec};
pub use defaults::{ComponentDefaults, DefaultsRegistry};
pub use environment::{
    builtin_environments, builtin_wizards, EnvironmentSpec, WizardSpec, WizardStep,
};

use crate::config::KdevConfig;
use crate::errors::{KdevError, Result};
use crate::render::template;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Catalog {
    components: Vec<ComponentSpec>,
    defaults: DefaultsRegistry,
    environments: Vec<EnvironmentSpec>,
    wizards: Vec<WizardSpec>,
}

impl Catalog {
    /// Build and validate a catalog
    ///
    /// # Errors
    ///
    /// `InvalidCatalog` when keys collide, a template is malformed or uses
    /// an undeclared placeholder, or an environment/wizard references
    /// something unregistered.
    pub fn new(
        components: Vec<ComponentSpec>,
        environments: Vec<EnvironmentSpec>,
        wizards: Vec<WizardSpec>,
    ) -> Result<Self> {
        let defaults = DefaultsRegistry::from_specs(&components);
        let catalog = Self {
            components,
            defaults,
            environments,
            wizards,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in tables
    ///
    /// # Errors
    ///
    /// See [`Catalog::new`].
    pub fn builtin() -> Result<Self> {
        Self::new(
            builtin_components(),
            builtin_environments(),
            builtin_wizards(),
        )
    }

    /// Built-in tables with `[components.*]` overrides applied
    ///
    /// # Errors
    ///
    /// `Config` for overrides naming unknown components or parameters.
    pub fn with_config(config: &KdevConfig) -> Result<Self> {
        let mut catalog = Self::builtin()?;
        catalog
            .defaults
            .apply_overrides(&catalog.components, &config.components)?;
        Ok(catalog)
    }

    /// Check the catalog invariants
    ///
    /// # Errors
    ///
    /// `InvalidCatalog` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(KdevError::InvalidCatalog { reason });

        let mut keys = HashSet::new();
        for component in &self.components {
            if !keys.insert(component.key) {
                return invalid(format!("duplicate component key '{}'", component.key));
            }
            let used = template::placeholders(component.template).map_err(|e| {
                KdevError::InvalidCatalog {
                    reason: format!("template for '{}': {}", component.key, e),
                }
            })?;
            if let Some(name) = used.iter().find(|n| !component.accepts(n)) {
                return invalid(format!(
                    "template for '{}' uses undeclared placeholder '{}'",
                    component.key, name
                ));
            }
        }

        let mut env_names = HashSet::new();
        let mut verbs = HashSet::new();
        for env in &self.environments {
            if !env_names.insert(env.name.as_str()) {
                return invalid(format!("duplicate environment '{}'", env.name));
            }
            if !verbs.insert(env.verb.as_str()) {
                return invalid(format!("duplicate environment verb '{}'", env.verb));
            }
            if let Some(missing) = env
                .components
                .iter()
                .find(|c| !keys.contains(c.as_str()))
            {
                return invalid(format!(
                    "environment '{}' references unknown component '{}'",
                    env.name, missing
                ));
            }
        }

        let mut wizard_names = HashSet::new();
        for wizard in &self.wizards {
            if !wizard_names.insert(wizard.name.as_str()) {
                return invalid(format!("duplicate wizard '{}'", wizard.name));
            }
            for step in &wizard.steps {
                if let WizardStep::Environment(name) = step {
                    if !env_names.contains(name.as_str()) {
                        return invalid(format!(
                            "wizard '{}' references unknown environment '{}'",
                            wizard.name, name
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    pub fn environments(&self) -> &[EnvironmentSpec] {
        &self.environments
    }

    pub fn wizards(&self) -> &[WizardSpec] {
        &self.wizards
    }

    pub fn defaults(&self) -> &DefaultsRegistry {
        &self.defaults
    }

    /// Mutable access for tests and embedding callers that inject defaults
    pub fn defaults_mut(&mut self) -> &mut DefaultsRegistry {
        &mut self.defaults
    }

    /// # Errors
    ///
    /// `UnknownComponent` if the key is not registered.
    pub fn component(&self, key: &str) -> Result<&ComponentSpec> {
        self.components
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| KdevError::UnknownComponent {
                key: key.to_string(),
            })
    }

    /// Default namespace for a component, after overrides
    ///
    /// # Errors
    ///
    /// `UnknownComponent` if the key is not registered.
    pub fn component_namespace(&self, key: &str) -> Result<String> {
        let spec = self.component(key)?;
        Ok(self
            .defaults
            .get(key)
            .map(|d| d.namespace.clone())
            .unwrap_or_else(|| spec.default_namespace.to_string()))
    }

    /// # Errors
    ///
    /// `UnknownEnvironment` if the name is not registered.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentSpec> {
        self.environments
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| KdevError::UnknownEnvironment {
                name: name.to_string(),
            })
    }

    /// # Errors
    ///
    /// `UnknownWizard` if the name is not registered.
    pub fn wizard(&self, name: &str) -> Result<&WizardSpec> {
        self.wizards
            .iter()
            .find(|w| w.name == name)
            .ok_or_else(|| KdevError::UnknownWizard {
                name: name.to_string(),
            })
    }
}
