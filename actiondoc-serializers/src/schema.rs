//! Declarative schemas: one primary resource, linked resources, metadata.
//!
//! A [`Schema`] is built once per document type with a [`SchemaBuilder`]
//! and never changes afterwards. Deriving a schema copies the base by
//! value, so declarations on the derived schema never reach the base.
//!
//! ```
//! use actiondoc_config::Configuration;
//! use actiondoc_serializers::{ResourceOptions, Schema, SerializerRegistry, SerializerType};
//! use serde::Serialize;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[derive(Debug, PartialEq, Serialize)]
//! struct Banana { ripe: bool }
//! impl actiondoc_serializers::Record for Banana {}
//!
//! let config = Configuration::default();
//! let registry = Arc::new(
//!     SerializerRegistry::new().with("banana", SerializerType::serde::<Banana>("BananaSerializer")),
//! );
//! let schema = Schema::builder("bananas#show", &config, registry)
//!     .resource("bananas", ResourceOptions::default())?
//!     .meta("version", |_| Ok(json!("1.2.1")))
//!     .build();
//! assert_eq!(schema.resource().map(|r| r.json_key()), Some("bananas"));
//! # Ok::<(), actiondoc_serializers::DocumentError>(())
//! ```

use crate::assembler::{Document, DocumentAssembler};
use crate::error::{DocumentError, Result};
use crate::options::{ResourceOptions, SerializeOptions};
use crate::record::Subject;
use crate::registry::SerializerRegistry;
use crate::resource::{ResourceKind, ResourceSpec};
use actiondoc_config::Configuration;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// What a metadata resolver can see.
#[derive(Debug, Clone, Copy)]
pub struct MetaContext<'a> {
    /// The subject the document is built from.
    pub subject: &'a Subject,
    /// Caller options for this build.
    pub options: &'a SerializeOptions,
}

/// Computes one metadata entry.
pub type MetaResolver = Arc<dyn Fn(&MetaContext<'_>) -> Result<Value> + Send + Sync>;

/// An immutable document schema.
#[derive(Clone)]
pub struct Schema {
    name: String,
    registry: Arc<SerializerRegistry>,
    resource: Option<ResourceSpec>,
    linked: Vec<ResourceSpec>,
    meta: BTreeMap<String, MetaResolver>,
    metadata_key: Option<String>,
    linked_key: Option<String>,
    links_key: String,
}

impl Schema {
    /// Starts a schema whose key names come from `config`.
    pub fn builder(
        name: impl Into<String>,
        config: &Configuration,
        registry: Arc<SerializerRegistry>,
    ) -> SchemaBuilder {
        SchemaBuilder {
            schema: Self {
                name: name.into(),
                registry,
                resource: None,
                linked: Vec::new(),
                meta: BTreeMap::new(),
                metadata_key: config.metadata_key().map(str::to_string),
                linked_key: config.linked_key().map(str::to_string),
                links_key: config.links_key().to_string(),
            },
        }
    }

    /// Starts a schema that inherits every declaration and key name of
    /// `base`.
    pub fn derive(base: &Schema, name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: Self {
                name: name.into(),
                ..base.clone()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &SerializerRegistry {
        &self.registry
    }

    pub fn resource(&self) -> Option<&ResourceSpec> {
        self.resource.as_ref()
    }

    /// Linked resources, in declaration order.
    pub fn linked(&self) -> &[ResourceSpec] {
        &self.linked
    }

    pub fn meta_keys(&self) -> impl Iterator<Item = &str> {
        self.meta.keys().map(String::as_str)
    }

    pub(crate) fn meta(&self) -> &BTreeMap<String, MetaResolver> {
        &self.meta
    }

    pub fn metadata_key(&self) -> Option<&str> {
        self.metadata_key.as_deref()
    }

    pub fn linked_key(&self) -> Option<&str> {
        self.linked_key.as_deref()
    }

    pub fn links_key(&self) -> &str {
        &self.links_key
    }

    /// Builds and serializes a document in one step.
    pub fn assemble(
        &self,
        config: &Configuration,
        subject: Subject,
        options: SerializeOptions,
    ) -> Result<Document> {
        Ok(DocumentAssembler::new(self, config, subject, options)?.serialize())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("resource", &self.resource)
            .field("linked", &self.linked)
            .field("meta", &self.meta.keys().collect::<Vec<_>>())
            .field("metadata_key", &self.metadata_key)
            .field("linked_key", &self.linked_key)
            .field("links_key", &self.links_key)
            .finish()
    }
}

/// Collects declarations for a [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declares the primary resource.
    ///
    /// Fails if a primary resource is already declared (including one
    /// inherited from a base schema), or if no serializer was given and the
    /// registry has none for `key`.
    pub fn resource(mut self, key: impl Into<String>, options: impl Into<ResourceOptions>) -> Result<Self> {
        let key = key.into();
        if let Some(existing) = &self.schema.resource {
            return Err(DocumentError::DuplicateResource {
                existing: existing.json_key().to_string(),
                attempted: key,
            });
        }

        let mut options = options.into();
        if options.serializer.is_none() {
            options.serializer = Some(self.schema.registry.resolve(&key)?);
        }
        self.schema.resource = Some(ResourceSpec::new(key, ResourceKind::Primary, options));
        Ok(self)
    }

    /// Appends a linked resource whose serializer is resolved from the
    /// registry on first use.
    pub fn linked(self, key: impl Into<String>) -> Self {
        self.linked_with(key, ResourceOptions::default())
    }

    /// Appends a linked resource with explicit options.
    ///
    /// Declaring the same key twice is allowed; the later declaration's
    /// output replaces the earlier one in the document.
    pub fn linked_with(mut self, key: impl Into<String>, options: impl Into<ResourceOptions>) -> Self {
        let key = key.into();
        if self.schema.linked.iter().any(|spec| spec.json_key() == key) {
            warn!(
                schema = %self.schema.name,
                key = %key,
                "Linked resource declared twice; the later declaration wins"
            );
        }
        self.schema
            .linked
            .push(ResourceSpec::new(key, ResourceKind::Linked, options.into()));
        self
    }

    /// Appends several linked resources in iteration order.
    pub fn linked_many<I, K>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ResourceOptions)>,
        K: Into<String>,
    {
        entries
            .into_iter()
            .fold(self, |builder, (key, options)| builder.linked_with(key, options))
    }

    /// Registers a metadata resolver, replacing any earlier one for `key`.
    pub fn meta<F>(mut self, key: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&MetaContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.schema.meta.insert(key.into(), Arc::new(resolver));
        self
    }

    /// Key nesting metadata; `None` merges metadata into the root.
    pub fn metadata_key(mut self, key: Option<&str>) -> Self {
        self.schema.metadata_key = key.map(str::to_string);
        self
    }

    /// Key nesting linked resources; `None` merges them into the root.
    pub fn linked_key(mut self, key: Option<&str>) -> Self {
        self.schema.linked_key = key.map(str::to_string);
        self
    }

    pub fn links_key(mut self, key: impl Into<String>) -> Self {
        self.schema.links_key = key.into();
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}
