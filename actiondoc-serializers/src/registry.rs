//! Explicit key-to-serializer registry, populated at startup.

use crate::error::{DocumentError, Result};
use crate::serializer::SerializerType;
use std::collections::HashMap;
use tracing::debug;

/// Maps resource keys to record serializers.
///
/// Resolution tries the key as given, then its singular form, so a
/// serializer registered as `banana` serves both `banana` and `bananas`.
#[derive(Debug, Clone, Default)]
pub struct SerializerRegistry {
    serializers: HashMap<String, SerializerType>,
}

impl SerializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `serializer` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, serializer: SerializerType) -> &mut Self {
        let key = key.into();
        debug!(key = %key, serializer = serializer.name(), "Registered serializer");
        self.serializers.insert(key, serializer);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, key: impl Into<String>, serializer: SerializerType) -> Self {
        self.register(key, serializer);
        self
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<&SerializerType> {
        self.serializers.get(key)
    }

    /// Lookup by exact key, then by singular form.
    pub fn lookup(&self, key: &str) -> Option<SerializerType> {
        self.get(key)
            .or_else(|| singularize(key).and_then(|singular| self.get(&singular)))
            .cloned()
    }

    /// Like [`lookup`](Self::lookup), failing with
    /// [`DocumentError::UnresolvedSerializer`].
    pub fn resolve(&self, key: &str) -> Result<SerializerType> {
        self.lookup(key)
            .ok_or_else(|| DocumentError::UnresolvedSerializer(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }
}

/// Singular form of a plural English key, or `None` if `key` does not look
/// plural. Handles `-ies`, `-(s|x|z|ch|sh)es` and plain `-s`.
fn singularize(key: &str) -> Option<String> {
    if let Some(stem) = key.strip_suffix("ies") {
        if !stem.is_empty() {
            return Some(format!("{stem}y"));
        }
    }
    if let Some(stem) = key.strip_suffix("es") {
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| stem.ends_with(end)) {
            return Some(stem.to_string());
        }
    }
    key.strip_suffix('s')
        .filter(|stem| !stem.is_empty() && !stem.ends_with('s'))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::singularize;

    #[test]
    fn plain_plural() {
        assert_eq!(singularize("bananas").as_deref(), Some("banana"));
        assert_eq!(singularize("brands").as_deref(), Some("brand"));
    }

    #[test]
    fn ies_plural() {
        assert_eq!(singularize("berries").as_deref(), Some("berry"));
    }

    #[test]
    fn es_plural() {
        assert_eq!(singularize("boxes").as_deref(), Some("box"));
        assert_eq!(singularize("peaches").as_deref(), Some("peach"));
    }

    #[test]
    fn singular_is_none() {
        assert_eq!(singularize("banana"), None);
        assert_eq!(singularize("glass"), None);
        assert_eq!(singularize("s"), None);
    }
}
