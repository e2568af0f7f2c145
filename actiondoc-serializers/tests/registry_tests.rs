mod common;

use actiondoc_serializers::{
    ActionRegistry, Configuration, DocumentError, ResourceOptions, Schema, SerializeOptions,
    SerializerRegistry, SerializerType, Subject,
};
use common::{Banana, Brand, banana, registry};
use serde_json::json;
use std::sync::Arc;

// ── SerializerRegistry ───────────────────────────────────────────

#[test]
fn exact_key_lookup() {
    let registry = registry();
    assert_eq!(registry.lookup("banana").unwrap().name(), "BananaSerializer");
    assert_eq!(registry.len(), 2);
}

#[test]
fn plural_key_falls_back_to_singular() {
    let registry = registry();
    assert_eq!(registry.lookup("bananas").unwrap().name(), "BananaSerializer");
    assert_eq!(registry.lookup("brands").unwrap().name(), "BrandSerializer");
}

#[test]
fn exact_key_beats_singular() {
    let registry = SerializerRegistry::new()
        .with("banana", SerializerType::serde::<Banana>("BananaSerializer"))
        .with("bananas", SerializerType::serde::<Banana>("BananaListSerializer"));
    assert_eq!(registry.lookup("bananas").unwrap().name(), "BananaListSerializer");
}

#[test]
fn unknown_key_is_absent() {
    let registry = registry();
    assert!(registry.lookup("apples").is_none());
    assert!(registry.get("bananas").is_none());
    assert!(matches!(
        registry.resolve("apples"),
        Err(DocumentError::UnresolvedSerializer(ref key)) if key == "apples"
    ));
}

#[test]
fn register_replaces_entry() {
    let mut registry = SerializerRegistry::new();
    assert!(registry.is_empty());
    registry
        .register("brand", SerializerType::serde::<Brand>("BrandSerializer"))
        .register("brand", SerializerType::serde::<Brand>("FancyBrandSerializer"));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("brand").unwrap().name(), "FancyBrandSerializer");
}

#[test]
fn serde_serializer_rejects_other_records() {
    let serializer = SerializerType::serde::<Brand>("BrandSerializer");
    let err = serializer
        .instantiate(Arc::new(banana(1)), &SerializeOptions::new())
        .serializable_object()
        .unwrap_err();
    assert!(err.to_string().contains("BrandSerializer"));
}

#[test]
fn serializer_type_debug_shows_name() {
    let serializer = SerializerType::serde::<Brand>("BrandSerializer");
    assert_eq!(format!("{serializer:?}"), "SerializerType(\"BrandSerializer\")");
}

// ── ActionRegistry ───────────────────────────────────────────────

fn show_schema(config: &Configuration) -> Schema {
    Schema::builder("bananas#show", config, registry())
        .resource("banana", ResourceOptions::default())
        .unwrap()
        .meta("action", |_| Ok(json!("show")))
        .build()
}

fn default_schema(config: &Configuration) -> Arc<Schema> {
    Arc::new(
        Schema::builder("default", config, registry())
            .resource("banana", ResourceOptions::default())
            .unwrap()
            .build(),
    )
}

#[test]
fn action_lookup_normalizes_controller() {
    let config = Configuration::default();
    let actions = ActionRegistry::new().with("BananasController", "show", show_schema(&config));

    assert_eq!(actions.len(), 1);
    assert_eq!(
        actions.schema_for("bananas", "SHOW").unwrap().name(),
        "bananas#show"
    );
    assert!(actions.schema_for("BananasController", "index").is_none());
}

#[test]
fn unknown_action_falls_back_to_default() {
    let config = Configuration::default();
    let actions = ActionRegistry::new().with("BananasController", "show", show_schema(&config));
    let fallback = default_schema(&config);

    let schema = actions.schema_or("BananasController", "index", &fallback);
    assert!(Arc::ptr_eq(&schema, &fallback));
}

#[test]
fn action_schema_drives_document() {
    let config = Configuration::default();
    let actions = ActionRegistry::new().with("BananasController", "show", show_schema(&config));
    let fallback = default_schema(&config);

    let document = actions
        .schema_or("BananasController", "show", &fallback)
        .assemble(&config, Subject::single(banana(2)), SerializeOptions::new())
        .unwrap();

    assert_eq!(document.get("meta"), Some(&json!({ "action": "show" })));
}
