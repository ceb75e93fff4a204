use kdev_core::catalog::Catalog;
use kdev_core::render::render_component;
use kdev_core::kube::{ensure_namespace, NamespaceOutcome};
use kdev_core::runtime::RecordingRuntime;
use proptest::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;

fn component_keys() -> Vec<String> {
    Catalog::builtin()
        .unwrap()
        .components()
        .iter()
        .map(|c| c.key.to_string())
        .collect()
}

fn namespace_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}[a-z0-9]"
}

#[test]
fn test_every_component_renders_to_yaml_with_defaults() {
    let catalog = Catalog::builtin().unwrap();
    for key in component_keys() {
        let manifest = render_component(&catalog, &key, None, &BTreeMap::new()).unwrap();
        assert!(!manifest.body.contains("{{"), "{} left a placeholder", key);
        for doc in serde_yaml::Deserializer::from_str(&manifest.body) {
            let value = serde_yaml::Value::deserialize(doc)
                .unwrap_or_else(|e| panic!("{} is not valid YAML: {}", key, e));
            assert!(value.get("kind").is_some(), "{} document without kind", key);
        }
    }
}

proptest! {
    #[test]
    fn prop_rendering_is_complete_for_any_namespace(
        index in 0usize..20,
        namespace in namespace_name(),
    ) {
        let catalog = Catalog::builtin().unwrap();
        let keys = component_keys();
        let key = &keys[index % keys.len()];

        let manifest = render_component(&catalog, key, Some(&namespace), &BTreeMap::new()).unwrap();
        prop_assert!(!manifest.body.contains("{{"));
        prop_assert!(!manifest.body.contains("}}"));
        let namespace_line = format!("namespace: {}", namespace);
        prop_assert!(manifest.body.contains(&namespace_line));
        prop_assert_eq!(manifest.namespace, namespace);
    }

    #[test]
    fn prop_namespace_creation_is_idempotent(namespace in namespace_name(), repeats in 1usize..5) {
        let stderr = format!(
            "Error from server (AlreadyExists): namespaces \"{}\" already exists",
            namespace
        );
        let rt = RecordingRuntime::new().fail_when(format!("create namespace {}", namespace), stderr);
        for _ in 0..repeats {
            prop_assert_eq!(ensure_namespace(&rt, &namespace).unwrap(), NamespaceOutcome::AlreadyExisted);
        }
        prop_assert_eq!(rt.calls().len(), repeats);
    }
}
