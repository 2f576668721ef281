//! Typed reads of a bundle's info dictionary.
//!
//! Where the dictionary comes from is up to the caller: anything implementing
//! [`BundleInfoSource`] can be passed to the accessors here, and `None` stands in
//! for a bundle without an info dictionary.

use std::collections::{BTreeMap, HashMap};

use crate::version::{self, SemanticVersion};

mod value;
pub use value::{BundleValue, FromBundleValue};

/// The info dictionary key holding a bundle's reverse-DNS identifier.
pub const IDENTIFIER_KEY: &str = "CFBundleIdentifier";
/// The info dictionary key holding a bundle's short display name.
pub const NAME_KEY: &str = "CFBundleName";
pub use version::{BUILD_VERSION_KEY, SHORT_VERSION_KEY};

/// Returned by [`id`] when the bundle has no identifier.
pub const NO_BUNDLE_ID: &str = "ERROR.NO_BUNDLE_ID_FOUND";

/// Something that can look up values in a bundle's info dictionary.
pub trait BundleInfoSource {
    fn info_value(&self, key: &str) -> Option<&BundleValue>;
}

impl<T: BundleInfoSource + ?Sized> BundleInfoSource for &T {
    fn info_value(&self, key: &str) -> Option<&BundleValue> {
        (**self).info_value(key)
    }
}

/// `None` is a bundle without an info dictionary; every key is absent.
impl<T: BundleInfoSource> BundleInfoSource for Option<T> {
    fn info_value(&self, key: &str) -> Option<&BundleValue> {
        self.as_ref()?.info_value(key)
    }
}

impl BundleInfoSource for BTreeMap<String, BundleValue> {
    fn info_value(&self, key: &str) -> Option<&BundleValue> {
        self.get(key)
    }
}

impl<S: core::hash::BuildHasher> BundleInfoSource for HashMap<String, BundleValue, S> {
    fn info_value(&self, key: &str) -> Option<&BundleValue> {
        self.get(key)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[cfg(feature = "json")]
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "toml")]
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("expected the root to be a dictionary, found {0}")]
    NotADictionary(&'static str),
}

/// An owned snapshot of a bundle's info dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleInfo {
    entries: BTreeMap<String, BundleValue>,
}

impl BundleInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<BundleValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<BundleValue>) -> Option<BundleValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a snapshot from JSON text, such as the output of `plutil -convert json -o - Info.plist`.
    #[cfg(feature = "json")]
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        match BundleValue::from_json(value) {
            Some(root) => Self::try_from(root),
            None => Err(LoadError::NotADictionary("null")),
        }
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        let table: toml::Table = toml::from_str(text)?;
        Self::try_from(BundleValue::from(toml::Value::Table(table)))
    }
}

impl TryFrom<BundleValue> for BundleInfo {
    type Error = LoadError;
    fn try_from(root: BundleValue) -> Result<Self, Self::Error> {
        match root {
            BundleValue::Dictionary(entries) => Ok(Self { entries }),
            other => Err(LoadError::NotADictionary(other.type_name())),
        }
    }
}

impl From<BTreeMap<String, BundleValue>> for BundleInfo {
    fn from(entries: BTreeMap<String, BundleValue>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<BundleValue>> FromIterator<(K, V)> for BundleInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect() }
    }
}

impl BundleInfoSource for BundleInfo {
    fn info_value(&self, key: &str) -> Option<&BundleValue> {
        self.entries.get(key)
    }
}

/// Fetches a value from the info dictionary, if it's present and of the requested type.
pub fn get<T: FromBundleValue>(source: &impl BundleInfoSource, key: &str) -> Option<T> {
    let value = source.info_value(key);
    let read = value.and_then(T::from_bundle_value);
    if read.is_none() {
        if let Some(value) = value {
            tracing::trace!(key, found = value.type_name(), expected = core::any::type_name::<T>(), "info dictionary value has another type");
        }
    }
    read
}

/// The bundle's identifier, like `"com.apple.finder"`, or [`NO_BUNDLE_ID`] if it has none.
pub fn id(source: &impl BundleInfoSource) -> String {
    get(source, IDENTIFIER_KEY).unwrap_or_else(|| NO_BUNDLE_ID.to_owned())
}

/// The bundle's name, like `"Finder"`, or an empty string if it has none.
pub fn name(source: &impl BundleInfoSource) -> String {
    get(source, NAME_KEY).unwrap_or_default()
}

/// The bundle's semantic version, built from `CFBundleShortVersionString` and `CFBundleVersion`.
///
/// A short version string that isn't a string counts as missing. See [`version::extract_version`] for the fallbacks.
pub fn version(source: &impl BundleInfoSource) -> SemanticVersion {
    let short_version = source.info_value(SHORT_VERSION_KEY).and_then(BundleValue::as_str);
    let build = source.info_value(BUILD_VERSION_KEY).and_then(BundleValue::as_str);
    version::extract_version(short_version, build)
}
