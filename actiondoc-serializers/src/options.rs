//! Options accepted at declaration time and at assembly time.

use crate::record::Subject;
use crate::serializer::SerializerType;
use actiondoc_config::CollectionStrategy;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Per-resource options given when a schema declares a resource.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    /// Record serializer; resolved from the registry by key when absent.
    pub serializer: Option<SerializerType>,
    /// Collection strategy override for this resource.
    pub collection_strategy: Option<CollectionStrategy>,
    /// Free-form options forwarded to every serializer of this resource.
    pub extra: Map<String, Value>,
}

impl ResourceOptions {
    pub fn with_serializer(mut self, serializer: SerializerType) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn with_strategy(mut self, strategy: CollectionStrategy) -> Self {
        self.collection_strategy = Some(strategy);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Shorthand: `resource("ripe_bananas", banana_serializer)`.
impl From<SerializerType> for ResourceOptions {
    fn from(serializer: SerializerType) -> Self {
        Self::default().with_serializer(serializer)
    }
}

/// Options supplied by the caller for one document build.
///
/// `only` and `except` are carried through to serializers but the
/// assembler does not filter fields with them.
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
    /// Serializer override for the primary resource.
    pub serializer: Option<SerializerType>,
    /// Collection strategy override for every resource in this build.
    pub collection_strategy: Option<CollectionStrategy>,
    /// Opaque value forwarded to serializers (usually the current user).
    pub scope: Option<Value>,
    pub only: Vec<String>,
    pub except: Vec<String>,
    /// Explicit linked collections, keyed by linked key. These bypass
    /// association lookup on the primary subject.
    pub linked: HashMap<String, Subject>,
    /// Root key of the resource being serialized. Set by the binding.
    pub root: Option<String>,
    /// Free-form options; caller entries win over declared ones.
    pub extra: Map<String, Value>,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_serializer(mut self, serializer: SerializerType) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn with_strategy(mut self, strategy: CollectionStrategy) -> Self {
        self.collection_strategy = Some(strategy);
        self
    }

    pub fn with_scope(mut self, scope: Value) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_linked(mut self, key: impl Into<String>, subject: Subject) -> Self {
        self.linked.insert(key.into(), subject);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn only<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn except<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Options for one resolution step: declared extras overlaid with the
    /// caller's, `root` set to the resource key. Explicit linked subjects
    /// stay with the assembler and are not forwarded.
    pub(crate) fn for_resource(&self, json_key: &str, declared: &Map<String, Value>) -> Self {
        let mut extra = declared.clone();
        for (key, value) in &self.extra {
            extra.insert(key.clone(), value.clone());
        }

        Self {
            serializer: self.serializer.clone(),
            collection_strategy: self.collection_strategy,
            scope: self.scope.clone(),
            only: self.only.clone(),
            except: self.except.clone(),
            linked: HashMap::new(),
            root: Some(json_key.to_string()),
            extra,
        }
    }

    /// Same options without the primary-resource serializer override.
    pub(crate) fn without_serializer(&self) -> Self {
        Self {
            serializer: None,
            ..self.clone()
        }
    }
}
