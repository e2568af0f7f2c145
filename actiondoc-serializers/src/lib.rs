//! Compound JSON document assembly for actiondoc.
//!
//! A document is built around one primary resource, with optional linked
//! resources and metadata:
//!
//! ```json
//! { "bananas": [ ... ], "linked": { "brands": [ ... ] }, "meta": { ... } }
//! ```
//!
//! The moving parts:
//! - [`Schema`] / [`SchemaBuilder`]: declares the primary resource, linked
//!   resources and metadata resolvers; derived schemas copy their base
//! - [`ResourceSpec`]: resolves one declared resource against a [`Subject`]
//! - [`collection`]: fresh-instance and reuse strategies for collections
//! - [`DocumentAssembler`]: resolves every fragment and merges them into a
//!   [`Document`]
//! - [`SerializerRegistry`] / [`ActionRegistry`]: explicit lookup tables
//!   replacing name-based type resolution
//!
//! Records are application types implementing [`Record`]; per-record JSON
//! comes from a [`RecordSerializer`] built by a [`SerializerType`].

mod actions;
mod assembler;
pub mod collection;
mod error;
mod options;
mod record;
mod registry;
mod resource;
mod schema;
mod serializer;

pub use actions::ActionRegistry;
pub use assembler::{Document, DocumentAssembler};
pub use error::{AccessorError, DocumentError, Result};
pub use options::{ResourceOptions, SerializeOptions};
pub use record::{Record, RecordEq, RecordRef, Subject, hash_record};
pub use registry::SerializerRegistry;
pub use resource::{Fragment, ResourceKind, ResourceSpec};
pub use schema::{MetaContext, MetaResolver, Schema, SchemaBuilder};
pub use serializer::{RecordSerializer, SerdeSerializer, SerializerType};

pub use actiondoc_config::{CollectionStrategy, Configuration};
