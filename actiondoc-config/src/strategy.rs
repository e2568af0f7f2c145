use serde::{Deserialize, Serialize};

/// How a collection is turned into an array of serialized fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStrategy {
    #[default]
    /// One serializer instance per record. Always correct.
    FreshInstance,
    /// One serializer instance per collection, rebound to each record in turn.
    ///
    /// Only valid for serializers that keep no per-record state beyond the
    /// bound subject; anything cached from a previous record leaks into the
    /// next fragment.
    Reuse,
}

impl CollectionStrategy {
    /// Stable name used in configuration files and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreshInstance => "fresh_instance",
            Self::Reuse => "reuse",
        }
    }
}

impl std::fmt::Display for CollectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
