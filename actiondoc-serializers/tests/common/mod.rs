//! Shared fixtures: bananas, their brands, and a few serializers.

#![allow(dead_code)]

use actiondoc_serializers::{
    AccessorError, DocumentError, Record, RecordEq, RecordRef, RecordSerializer, Result, SerializeOptions,
    SerializerRegistry, SerializerType, Subject, hash_record,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Brand {
    pub name: String,
}

impl Record for Brand {
    fn record_hash(&self) -> Option<u64> {
        Some(hash_record(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banana {
    pub id: u32,
    pub ripe: bool,
    #[serde(skip)]
    pub brands: Vec<Brand>,
}

impl Record for Banana {
    fn association(&self, key: &str) -> std::result::Result<Subject, AccessorError> {
        match key {
            "brands" => Ok(Subject::collection(self.brands.clone())),
            "brand" => self
                .brands
                .first()
                .cloned()
                .map(Subject::single)
                .ok_or_else(|| AccessorError::failed(key, "banana has no brand")),
            _ => Err(AccessorError::missing(key)),
        }
    }
}

/// Holds bananas; bananas do not implement `record_hash`.
#[derive(Debug, Clone, PartialEq)]
pub struct FruitCrate {
    pub bananas: Vec<Banana>,
}

impl Record for FruitCrate {
    fn association(&self, key: &str) -> std::result::Result<Subject, AccessorError> {
        match key {
            "bananas" => Ok(Subject::collection(self.bananas.clone())),
            _ => Err(AccessorError::missing(key)),
        }
    }
}

pub fn brand(name: &str) -> Brand {
    Brand {
        name: name.to_string(),
    }
}

pub fn banana(id: u32) -> Banana {
    Banana {
        id,
        ripe: id % 2 == 0,
        brands: Vec::new(),
    }
}

pub fn banana_with(id: u32, brands: &[&str]) -> Banana {
    Banana {
        brands: brands.iter().map(|name| brand(name)).collect(),
        ..banana(id)
    }
}

pub fn banana_json(id: u32) -> Value {
    json!({ "id": id, "ripe": id % 2 == 0 })
}

pub fn brand_json(name: &str) -> Value {
    json!({ "name": name })
}

/// `banana` and `brand` registered with serde-backed serializers.
pub fn registry() -> Arc<SerializerRegistry> {
    Arc::new(
        SerializerRegistry::new()
            .with("banana", SerializerType::serde::<Banana>("BananaSerializer"))
            .with("brand", SerializerType::serde::<Brand>("BrandSerializer")),
    )
}

fn as_banana<'a>(serializer: &str, subject: &'a RecordRef) -> Result<&'a Banana> {
    let record: &dyn Record = &**subject;
    RecordEq::as_any(record)
        .downcast_ref::<Banana>()
        .ok_or_else(|| DocumentError::SubjectMismatch {
            serializer: serializer.to_string(),
            found: RecordEq::type_name(record).to_string(),
        })
}

/// Emits the banana id plus the scope and root it was built with.
pub struct ScopedBananaSerializer {
    subject: RecordRef,
    scope: Option<Value>,
    root: Option<String>,
}

impl RecordSerializer for ScopedBananaSerializer {
    fn bind(&mut self, subject: RecordRef) {
        self.subject = subject;
    }

    fn serializable_object(&self) -> Result<Value> {
        let banana = as_banana("ScopedBananaSerializer", &self.subject)?;
        Ok(json!({
            "id": banana.id,
            "viewer": self.scope,
            "root": self.root,
        }))
    }
}

pub fn scoped_serializer() -> SerializerType {
    SerializerType::new("ScopedBananaSerializer", |subject, options: &SerializeOptions| {
        ScopedBananaSerializer {
            subject,
            scope: options.scope.clone(),
            root: options.root.clone(),
        }
    })
}

/// Emits only the banana id and counts how many instances were built.
pub struct IdSerializer {
    subject: RecordRef,
}

impl RecordSerializer for IdSerializer {
    fn bind(&mut self, subject: RecordRef) {
        self.subject = subject;
    }

    fn serializable_object(&self) -> Result<Value> {
        let banana = as_banana("IdSerializer", &self.subject)?;
        Ok(json!({ "id": banana.id }))
    }
}

pub fn counting_serializer(instances: Arc<AtomicUsize>) -> SerializerType {
    SerializerType::new("IdSerializer", move |subject, _options: &SerializeOptions| {
        instances.fetch_add(1, Ordering::SeqCst);
        IdSerializer { subject }
    })
}

/// Caches its first fragment and never clears it on rebind.
pub struct MemoizingSerializer {
    subject: RecordRef,
    cached: RefCell<Option<Value>>,
}

impl RecordSerializer for MemoizingSerializer {
    fn bind(&mut self, subject: RecordRef) {
        self.subject = subject;
    }

    fn serializable_object(&self) -> Result<Value> {
        if let Some(cached) = self.cached.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let banana = as_banana("MemoizingSerializer", &self.subject)?;
        let value = json!({ "id": banana.id });
        *self.cached.borrow_mut() = Some(value.clone());
        Ok(value)
    }
}

pub fn memoizing_serializer() -> SerializerType {
    SerializerType::new("MemoizingSerializer", |subject, _options: &SerializeOptions| {
        MemoizingSerializer {
            subject,
            cached: RefCell::new(None),
        }
    })
}

pub fn records(ids: impl IntoIterator<Item = u32>) -> Vec<RecordRef> {
    ids.into_iter()
        .map(|id| Arc::new(banana(id)) as RecordRef)
        .collect()
}
