//! Serializer configuration for actiondoc.
//!
//! A [`Configuration`] is an immutable snapshot built once during bootstrap
//! and passed explicitly to schema definition and document assembly:
//! - key names used in the emitted document (`meta`, `linked`, `links`)
//! - metadata every document carries (plus the optional profile URL)
//! - the default [`CollectionStrategy`] for serializing collections
//!
//! Snapshots are meant to be shared read-only (typically behind an `Arc`).
//! Any mutation must finish before concurrent document assembly starts.

mod configuration;
mod error;
mod strategy;

pub use configuration::{Configuration, Settings};
pub use error::{ConfigError, ConfigResult};
pub use strategy::CollectionStrategy;
