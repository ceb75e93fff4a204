//! Manifest rendering
//!
//! Component manifests, ingress resources and the `generate-manifests`
//! scaffold all go through the same `{{placeholder}}` engine.

pub mod component_render;
pub mod ingress;
pub mod scaffold;
pub mod template;

pub use component_render::{render_component, RenderedManifest};
pub use ingress::{render_ingress, render_tls_ingress, IngressSpec};
pub use scaffold::{render_scaffold, ScaffoldFile, INGRESS_FILE, SCAFFOLD_FILES};
pub use template::TemplateError;

use crate::errors::{KdevError, Result};
use std::collections::BTreeMap;

/// Substitute a built-in template whose placeholders are fixed at compile time
fn fill_builtin(template_name: &str, source: &str, values: &BTreeMap<String, String>) -> Result<String> {
    template::substitute(source, values).map_err(|e| KdevError::InvalidCatalog {
        reason: format!("template '{}': {}", template_name, e),
    })
}

fn values<'a, I>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
