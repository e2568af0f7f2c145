//! Immutable configuration snapshot and its TOML loader.

use crate::error::{ConfigError, ConfigResult};
use crate::strategy::CollectionStrategy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

/// Mutable bag of settings, only reachable during [`Configuration::configure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key nesting metadata in the document; `None` merges it into the root.
    pub metadata_key: Option<String>,
    /// Key nesting linked resources; `None` merges them into the root.
    pub linked_key: Option<String>,
    /// Key describing URL templates.
    pub links_key: String,
    /// Metadata every document carries.
    pub global_metadata: Map<String, Value>,
    /// Profile URL describing document extensions, emitted as `profile`.
    pub profile_url: Option<String>,
    /// Strategy used for collections when nothing more specific is given.
    pub collection_strategy: CollectionStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metadata_key: Some("meta".to_string()),
            linked_key: Some("linked".to_string()),
            links_key: "links".to_string(),
            global_metadata: Map::new(),
            profile_url: None,
            collection_strategy: CollectionStrategy::default(),
        }
    }
}

/// Read-only serializer configuration.
///
/// Built once at startup and handed to schema definition and document
/// assembly. There is no global instance: callers own the snapshot and share
/// it as they see fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    settings: Settings,
    resolved_metadata: Map<String, Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from_settings(Settings::default())
    }
}

impl Configuration {
    /// Builds a snapshot from defaults plus one bootstrap mutation.
    ///
    /// ```
    /// use actiondoc_config::Configuration;
    ///
    /// let config = Configuration::configure(|c| {
    ///     c.profile_url = Some("https://example.test/profile.txt".into());
    /// });
    /// assert!(config.resolved_metadata().contains_key("profile"));
    /// ```
    pub fn configure(f: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::default();
        f(&mut settings);
        Self::from_settings(settings)
    }

    /// Derives a new snapshot from this one. The receiver is left untouched.
    pub fn reconfigure(&self, f: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = self.settings.clone();
        f(&mut settings);
        Self::from_settings(settings)
    }

    /// Freezes a settings bag into a snapshot.
    pub fn from_settings(settings: Settings) -> Self {
        let mut resolved_metadata = settings.global_metadata.clone();
        if let Some(url) = &settings.profile_url {
            resolved_metadata.insert("profile".to_string(), Value::String(url.clone()));
        }
        Self {
            settings,
            resolved_metadata,
        }
    }

    pub fn metadata_key(&self) -> Option<&str> {
        self.settings.metadata_key.as_deref()
    }

    pub fn linked_key(&self) -> Option<&str> {
        self.settings.linked_key.as_deref()
    }

    pub fn links_key(&self) -> &str {
        &self.settings.links_key
    }

    pub fn global_metadata(&self) -> &Map<String, Value> {
        &self.settings.global_metadata
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.settings.profile_url.as_deref()
    }

    pub fn collection_strategy(&self) -> CollectionStrategy {
        self.settings.collection_strategy
    }

    /// Global metadata merged with `{"profile": profile_url}` when a profile
    /// URL is set. Computed once per snapshot.
    pub fn resolved_metadata(&self) -> &Map<String, Value> {
        &self.resolved_metadata
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parses the `[serializers]` table of a TOML document.
    ///
    /// TOML has no null, so an empty string for `metadata_key` or
    /// `linked_key` means "merge into the document root".
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        file.serializers.into_settings().map(Self::from_settings)
    }

    /// Loads configuration from an explicit path.
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error, since key names change the shape of every document.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No serializer configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!(
            path = %path.display(),
            strategy = %config.collection_strategy(),
            "Loaded serializer configuration"
        );
        Ok(config)
    }
}

/// Raw TOML structure matching the configuration file format.
#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    serializers: SerializersSection,
}

#[derive(Deserialize, Default)]
struct SerializersSection {
    metadata_key: Option<String>,
    linked_key: Option<String>,
    links_key: Option<String>,
    #[serde(default)]
    global_metadata: Map<String, Value>,
    profile_url: Option<String>,
    #[serde(default)]
    collection_strategy: CollectionStrategy,
}

impl SerializersSection {
    fn into_settings(self) -> ConfigResult<Settings> {
        let defaults = Settings::default();

        let links_key = match self.links_key {
            Some(key) if key.is_empty() => {
                return Err(ConfigError::InvalidValue {
                    key: "links_key".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            Some(key) => key,
            None => defaults.links_key,
        };

        Ok(Settings {
            metadata_key: nullable_key(self.metadata_key, defaults.metadata_key),
            linked_key: nullable_key(self.linked_key, defaults.linked_key),
            links_key,
            global_metadata: self.global_metadata,
            profile_url: self.profile_url.filter(|url| !url.is_empty()),
            collection_strategy: self.collection_strategy,
        })
    }
}

fn nullable_key(raw: Option<String>, default: Option<String>) -> Option<String> {
    match raw {
        Some(key) if key.is_empty() => None,
        Some(key) => Some(key),
        None => default,
    }
}
