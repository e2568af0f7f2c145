//! Per-record serializers: the collaborator that turns one record into JSON.

use crate::error::{DocumentError, Result};
use crate::options::SerializeOptions;
use crate::record::{Record, RecordEq, RecordRef};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Serializes whichever record is currently bound to it.
pub trait RecordSerializer {
    /// Rebinds the serializer to another record.
    ///
    /// Implementations used with [`CollectionStrategy::Reuse`] must drop
    /// everything derived from the previous subject here.
    ///
    /// [`CollectionStrategy::Reuse`]: actiondoc_config::CollectionStrategy::Reuse
    fn bind(&mut self, subject: RecordRef);

    /// JSON fragment for the bound record.
    fn serializable_object(&self) -> Result<Value>;

    /// Direct entry point for single-record serialization.
    fn to_json(&self, options: &SerializeOptions) -> Result<Value> {
        let _ = options;
        self.serializable_object()
    }
}

type Factory = dyn Fn(RecordRef, &SerializeOptions) -> Box<dyn RecordSerializer> + Send + Sync;

/// A named serializer constructor, the unit stored in registries and
/// resource declarations.
#[derive(Clone)]
pub struct SerializerType {
    name: Arc<str>,
    factory: Arc<Factory>,
}

impl SerializerType {
    pub fn new<F, S>(name: impl Into<Arc<str>>, factory: F) -> Self
    where
        F: Fn(RecordRef, &SerializeOptions) -> S + Send + Sync + 'static,
        S: RecordSerializer + 'static,
    {
        let factory: Arc<Factory> = Arc::new(
            move |subject: RecordRef, options: &SerializeOptions| -> Box<dyn RecordSerializer> {
                Box::new(factory(subject, options))
            },
        );
        Self {
            name: name.into(),
            factory,
        }
    }

    /// Serializer for any `T: Serialize` record, via `serde_json::to_value`.
    pub fn serde<T>(name: impl Into<Arc<str>>) -> Self
    where
        T: Serialize + 'static,
    {
        let name: Arc<str> = name.into();
        let serializer_name = Arc::clone(&name);
        let factory: Arc<Factory> = Arc::new(
            move |subject: RecordRef, _options: &SerializeOptions| -> Box<dyn RecordSerializer> {
                Box::new(SerdeSerializer::<T>::new(Arc::clone(&serializer_name), subject))
            },
        );
        Self { name, factory }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructs a serializer bound to `subject`.
    pub fn instantiate(
        &self,
        subject: RecordRef,
        options: &SerializeOptions,
    ) -> Box<dyn RecordSerializer> {
        (self.factory)(subject, options)
    }
}

impl fmt::Debug for SerializerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SerializerType").field(&self.name).finish()
    }
}

/// Serializes records of type `T` through their `Serialize` impl.
pub struct SerdeSerializer<T> {
    name: Arc<str>,
    subject: RecordRef,
    _record: PhantomData<fn() -> T>,
}

impl<T> SerdeSerializer<T> {
    pub fn new(name: Arc<str>, subject: RecordRef) -> Self {
        Self {
            name,
            subject,
            _record: PhantomData,
        }
    }
}

impl<T: Serialize + 'static> RecordSerializer for SerdeSerializer<T> {
    fn bind(&mut self, subject: RecordRef) {
        self.subject = subject;
    }

    fn serializable_object(&self) -> Result<Value> {
        let record: &dyn Record = &*self.subject;
        let typed = RecordEq::as_any(record).downcast_ref::<T>().ok_or_else(|| {
            DocumentError::SubjectMismatch {
                serializer: self.name.to_string(),
                found: RecordEq::type_name(record).to_string(),
            }
        })?;
        Ok(serde_json::to_value(typed)?)
    }
}
