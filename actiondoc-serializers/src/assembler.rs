//! Document assembly: resolve every fragment, then merge under the
//! schema's key names.

use crate::error::{DocumentError, Result};
use crate::options::SerializeOptions;
use crate::record::Subject;
use crate::resource::Fragment;
use crate::schema::{MetaContext, Schema};
use actiondoc_config::Configuration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A compound document: primary resource, linked resources and metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}

/// Holds the resolved fragments of one document build.
///
/// Construction does all the work that can fail; [`serialize`](Self::serialize)
/// only merges. An assembler belongs to the request that created it.
#[derive(Debug)]
pub struct DocumentAssembler<'s> {
    schema: &'s Schema,
    primary: Fragment,
    linked: Vec<Fragment>,
    metadata: Map<String, Value>,
}

impl<'s> DocumentAssembler<'s> {
    pub fn new(
        schema: &'s Schema,
        config: &Configuration,
        subject: Subject,
        options: SerializeOptions,
    ) -> Result<Self> {
        let resource = schema.resource().ok_or(DocumentError::MissingResource)?;
        if !options.only.is_empty() || !options.except.is_empty() {
            debug!(schema = schema.name(), "Field filters (only/except) are not applied");
        }

        let primary = resource.resolve(subject.clone(), &options, schema.registry(), config)?;

        let linked_options = options.without_serializer();
        let linked = schema
            .linked()
            .iter()
            .map(|spec| {
                let linked_subject = match options.linked.get(spec.json_key()) {
                    Some(explicit) => explicit.clone(),
                    None => subject.association(spec.json_key())?,
                };
                spec.resolve(linked_subject, &linked_options, schema.registry(), config)
            })
            .collect::<Result<Vec<_>>>()?;

        let context = MetaContext {
            subject: &subject,
            options: &options,
        };
        let mut metadata = config.resolved_metadata().clone();
        for (key, resolver) in schema.meta() {
            metadata.insert(key.clone(), resolver(&context)?);
        }

        debug!(
            schema = schema.name(),
            resource = %primary.key,
            linked = linked.len(),
            metadata = metadata.len(),
            "Resolved document fragments"
        );

        Ok(Self {
            schema,
            primary,
            linked,
            metadata,
        })
    }

    /// Merges the fragments into the final document.
    ///
    /// Linked fragments go under the linked key (or the root), later ones
    /// replacing earlier ones with the same key. Metadata goes under the
    /// metadata key; merged into the root it never replaces resource or
    /// linked entries.
    pub fn serialize(self) -> Document {
        let mut result = self.primary.into_map();

        if !self.linked.is_empty() {
            match self.schema.linked_key() {
                Some(linked_key) => {
                    let section = self
                        .linked
                        .into_iter()
                        .map(|fragment| (fragment.key, fragment.value))
                        .collect::<Map<_, _>>();
                    result.insert(linked_key.to_string(), Value::Object(section));
                }
                None => {
                    for fragment in self.linked {
                        result.insert(fragment.key, fragment.value);
                    }
                }
            }
        }

        if !self.metadata.is_empty() {
            match self.schema.metadata_key() {
                Some(metadata_key) => {
                    result.insert(metadata_key.to_string(), Value::Object(self.metadata));
                }
                None => {
                    for (key, value) in self.metadata {
                        if result.contains_key(&key) {
                            warn!(
                                schema = self.schema.name(),
                                key = %key,
                                "Metadata entry collides with document key; dropped"
                            );
                            continue;
                        }
                        result.insert(key, value);
                    }
                }
            }
        }

        Document(result)
    }
}
