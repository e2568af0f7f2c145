//! Resource bindings: one declared resource resolved against a subject.

use crate::collection;
use crate::error::Result;
use crate::options::{ResourceOptions, SerializeOptions};
use crate::record::Subject;
use crate::registry::SerializerRegistry;
use crate::serializer::SerializerType;
use actiondoc_config::{CollectionStrategy, Configuration};
use serde_json::{Map, Value};

/// A serialized resource section, prior to merging into a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub key: String,
    pub value: Value,
}

impl Fragment {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(self.key, self.value);
        map
    }
}

/// Whether a resource is the document's primary resource or a linked one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Primary,
    /// Always emitted as an array, even for a single record.
    Linked,
}

/// A resource declared on a schema.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    json_key: String,
    kind: ResourceKind,
    serializer: Option<SerializerType>,
    collection_strategy: Option<CollectionStrategy>,
    extra: Map<String, Value>,
}

impl ResourceSpec {
    pub(crate) fn new(json_key: String, kind: ResourceKind, options: ResourceOptions) -> Self {
        Self {
            json_key,
            kind,
            serializer: options.serializer,
            collection_strategy: options.collection_strategy,
            extra: options.extra,
        }
    }

    pub fn json_key(&self) -> &str {
        &self.json_key
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The declared serializer, if one was given rather than resolved.
    pub fn serializer(&self) -> Option<&SerializerType> {
        self.serializer.as_ref()
    }

    pub fn collection_strategy(&self) -> Option<CollectionStrategy> {
        self.collection_strategy
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Serializes `subject` into `{ json_key: value }`.
    ///
    /// Already-serialized data is wrapped untouched. Collections go through
    /// the collection strategy (caller override, then declared, then
    /// configured default). A single record is serialized directly, except
    /// for linked resources, which wrap it in a one-element collection.
    pub fn resolve(
        &self,
        subject: Subject,
        options: &SerializeOptions,
        registry: &SerializerRegistry,
        config: &Configuration,
    ) -> Result<Fragment> {
        let records = match subject {
            Subject::Serialized(data) => {
                return Ok(Fragment::new(self.json_key.clone(), Value::Object(data)));
            }
            Subject::Single(record) if self.kind == ResourceKind::Primary => {
                let options = options.for_resource(&self.json_key, &self.extra);
                let serializer = self.serializer_for(&options, registry)?;
                let value = serializer.instantiate(record, &options).to_json(&options)?;
                return Ok(Fragment::new(self.json_key.clone(), value));
            }
            Subject::Single(record) => vec![record],
            Subject::Collection(records) => records,
        };

        let options = options.for_resource(&self.json_key, &self.extra);
        let serializer = self.serializer_for(&options, registry)?;
        let strategy = options
            .collection_strategy
            .or(self.collection_strategy)
            .unwrap_or_else(|| config.collection_strategy());
        let values = collection::build(strategy, &records, &serializer, &options)?;
        Ok(Fragment::new(self.json_key.clone(), Value::Array(values)))
    }

    /// Caller override first, then the declared serializer, then the
    /// registry. Linked resources reach the registry lazily, here.
    fn serializer_for(
        &self,
        options: &SerializeOptions,
        registry: &SerializerRegistry,
    ) -> Result<SerializerType> {
        match (&options.serializer, &self.serializer) {
            (Some(serializer), _) | (None, Some(serializer)) => Ok(serializer.clone()),
            (None, None) => registry.resolve(&self.json_key),
        }
    }
}
