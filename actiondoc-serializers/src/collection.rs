//! Collection serialization strategies.
//!
//! Both strategies emit one fragment per record, in input order. They
//! differ only in how many serializer instances they construct.

use crate::error::Result;
use crate::options::SerializeOptions;
use crate::record::RecordRef;
use crate::serializer::{RecordSerializer, SerializerType};
use actiondoc_config::CollectionStrategy;
use serde_json::Value;
use tracing::trace;

/// Serializes `records` with `serializer` under the chosen strategy.
///
/// A new strategy instance is created for every call; nothing is pooled
/// across calls.
pub fn build(
    strategy: CollectionStrategy,
    records: &[RecordRef],
    serializer: &SerializerType,
    options: &SerializeOptions,
) -> Result<Vec<Value>> {
    trace!(
        serializer = serializer.name(),
        strategy = %strategy,
        records = records.len(),
        "Serializing collection"
    );
    match strategy {
        CollectionStrategy::FreshInstance => FreshInstance::new(serializer, options).build(records),
        CollectionStrategy::Reuse => ReuseInstance::new(serializer, options).build(records),
    }
}

/// Constructs one serializer per record.
pub struct FreshInstance<'a> {
    serializer: &'a SerializerType,
    options: &'a SerializeOptions,
}

impl<'a> FreshInstance<'a> {
    pub fn new(serializer: &'a SerializerType, options: &'a SerializeOptions) -> Self {
        Self {
            serializer,
            options,
        }
    }

    pub fn build(self, records: &[RecordRef]) -> Result<Vec<Value>> {
        records
            .iter()
            .map(|record| {
                self.serializer
                    .instantiate(record.clone(), self.options)
                    .serializable_object()
            })
            .collect()
    }
}

/// Constructs a single serializer and rebinds it to each record in turn.
///
/// # Precondition
///
/// The wrapped serializer must keep no state derived from a previous
/// subject once [`RecordSerializer::bind`] is called. A serializer that
/// memoizes anything per record will leak it into later fragments; use
/// [`FreshInstance`] for those.
///
/// The instance is owned by one `build` call and driven strictly in
/// sequence. It is consumed by `build` so it cannot be reused.
pub struct ReuseInstance<'a> {
    serializer: &'a SerializerType,
    options: &'a SerializeOptions,
}

impl<'a> ReuseInstance<'a> {
    pub fn new(serializer: &'a SerializerType, options: &'a SerializeOptions) -> Self {
        Self {
            serializer,
            options,
        }
    }

    pub fn build(self, records: &[RecordRef]) -> Result<Vec<Value>> {
        let Some((first, rest)) = records.split_first() else {
            return Ok(Vec::new());
        };

        let mut instance: Box<dyn RecordSerializer> =
            self.serializer.instantiate(first.clone(), self.options);
        let mut fragments = Vec::with_capacity(records.len());
        fragments.push(instance.serializable_object()?);
        for record in rest {
            instance.bind(record.clone());
            fragments.push(instance.serializable_object()?);
        }
        Ok(fragments)
    }
}
