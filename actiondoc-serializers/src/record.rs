//! Records and the subject union handed to serializers.

use crate::error::AccessorError;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared handle to a record.
pub type RecordRef = Arc<dyn Record>;

/// A domain object that can be serialized and may expose associations.
///
/// `association` backs linked-resource lookup: for a schema declaring
/// `linked("brands")`, every primary record is asked for `"brands"`.
///
/// ```
/// use actiondoc_serializers::{AccessorError, Record, Subject};
///
/// #[derive(Debug, PartialEq)]
/// struct Brand { name: String }
///
/// #[derive(Debug, PartialEq)]
/// struct Banana { brands: Vec<Brand> }
///
/// impl Record for Brand {}
///
/// impl Record for Banana {
///     fn association(&self, key: &str) -> Result<Subject, AccessorError> {
///         match key {
///             "brands" => Ok(Subject::collection(
///                 self.brands.iter().map(|b| Brand { name: b.name.clone() }),
///             )),
///             _ => Err(AccessorError::missing(key)),
///         }
///     }
/// }
/// ```
pub trait Record: RecordEq + fmt::Debug + Send + Sync {
    /// Returns the association stored under `key`.
    fn association(&self, key: &str) -> Result<Subject, AccessorError> {
        Err(AccessorError::missing(key))
    }

    /// Hash consistent with the record's `PartialEq`, used to bucket
    /// records when linked collections are de-duplicated.
    ///
    /// Records returning `None` are compared pairwise, which is quadratic
    /// in the size of the linked collection. `Hash` types can return
    /// `Some(hash_record(self))`.
    fn record_hash(&self) -> Option<u64> {
        None
    }
}

/// Hashes a record for [`Record::record_hash`].
pub fn hash_record<T: Hash + ?Sized>(record: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.hash(&mut hasher);
    hasher.finish()
}

/// Records in first-seen order, without value-equal duplicates.
#[derive(Default)]
struct DistinctRecords {
    records: Vec<RecordRef>,
    buckets: HashMap<u64, Vec<usize>>,
    unhashed: Vec<usize>,
}

impl DistinctRecords {
    fn insert(&mut self, candidate: RecordRef) {
        let hash = candidate.record_hash();
        let peers = match hash {
            Some(hash) => self.buckets.get(&hash).map(Vec::as_slice).unwrap_or_default(),
            None => self.unhashed.as_slice(),
        };
        if peers
            .iter()
            .any(|&index| self.records[index].eq_record(&*candidate))
        {
            return;
        }

        let index = self.records.len();
        match hash {
            Some(hash) => self.buckets.entry(hash).or_default().push(index),
            None => self.unhashed.push(index),
        }
        self.records.push(candidate);
    }
}

/// Value equality across record trait objects.
///
/// Blanket-implemented for every `PartialEq` type; records of different
/// concrete types are never equal.
pub trait RecordEq: Any {
    fn as_any(&self) -> &dyn Any;
    fn eq_record(&self, other: &dyn Record) -> bool;
    fn type_name(&self) -> &'static str;
}

impl<T: PartialEq + Any> RecordEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_record(&self, other: &dyn Record) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// What a resource is built from, decided once at the API surface.
#[derive(Debug, Clone)]
pub enum Subject {
    /// A single record.
    Single(RecordRef),
    /// An ordered collection of records.
    Collection(Vec<RecordRef>),
    /// Already-serialized data, emitted as-is without a serializer.
    Serialized(Map<String, Value>),
}

impl Subject {
    pub fn single<R: Record>(record: R) -> Self {
        Self::Single(Arc::new(record))
    }

    pub fn collection<R, I>(records: I) -> Self
    where
        R: Record,
        I: IntoIterator<Item = R>,
    {
        Self::Collection(
            records
                .into_iter()
                .map(|record| Arc::new(record) as RecordRef)
                .collect(),
        )
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Flattens into a record list. Serialized data carries no records.
    pub fn into_records(self) -> Option<Vec<RecordRef>> {
        match self {
            Self::Single(record) => Some(vec![record]),
            Self::Collection(records) => Some(records),
            Self::Serialized(_) => None,
        }
    }

    /// Looks up `key` on the subject's records.
    ///
    /// A single record returns its association as-is. A collection returns
    /// the union of every record's association, keeping first occurrences
    /// and dropping value-equal duplicates. Duplicate detection is linear
    /// for records that implement [`Record::record_hash`].
    pub fn association(&self, key: &str) -> Result<Subject, AccessorError> {
        match self {
            Self::Single(record) => record.association(key),
            Self::Collection(records) => {
                let mut union = DistinctRecords::default();
                for record in records {
                    let associated = record
                        .association(key)?
                        .into_records()
                        .ok_or_else(|| {
                            AccessorError::failed(key, "association returned serialized data")
                        })?;
                    for candidate in associated {
                        union.insert(candidate);
                    }
                }
                Ok(Self::Collection(union.records))
            }
            Self::Serialized(_) => Err(AccessorError::missing(key)),
        }
    }
}

impl From<RecordRef> for Subject {
    fn from(record: RecordRef) -> Self {
        Self::Single(record)
    }
}

impl From<Vec<RecordRef>> for Subject {
    fn from(records: Vec<RecordRef>) -> Self {
        Self::Collection(records)
    }
}

impl From<Map<String, Value>> for Subject {
    fn from(data: Map<String, Value>) -> Self {
        Self::Serialized(data)
    }
}
