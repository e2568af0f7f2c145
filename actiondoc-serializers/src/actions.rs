//! Controller/action to schema lookup for host integrations.

use crate::schema::Schema;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps a `(controller, action)` pair to the schema rendering it.
///
/// Controller names are normalized by dropping a trailing `Controller` and
/// lowercasing, so `BananasController` and `bananas` name the same entry.
/// Actions are lowercased.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    schemas: HashMap<(String, String), Arc<Schema>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, controller: &str, action: &str, schema: Arc<Schema>) -> &mut Self {
        self.schemas.insert(action_key(controller, action), schema);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, controller: &str, action: &str, schema: Schema) -> Self {
        self.register(controller, action, Arc::new(schema));
        self
    }

    pub fn schema_for(&self, controller: &str, action: &str) -> Option<Arc<Schema>> {
        self.schemas.get(&action_key(controller, action)).cloned()
    }

    /// The action's schema, or `default` when none is registered.
    pub fn schema_or(&self, controller: &str, action: &str, default: &Arc<Schema>) -> Arc<Schema> {
        self.schema_for(controller, action)
            .unwrap_or_else(|| Arc::clone(default))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn action_key(controller: &str, action: &str) -> (String, String) {
    let controller = controller.strip_suffix("Controller").unwrap_or(controller);
    (controller.to_lowercase(), action.to_lowercase())
}
