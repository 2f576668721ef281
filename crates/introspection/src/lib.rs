//! Normalizes loosely-typed platform metadata into well-defined values.
//!
//! The raw inputs come from two collaborators this crate does not own: the
//! key/value snapshot of an application bundle's info dictionary, and the raw
//! hardware model identifier of the machine (like `"MacBookAir9,1"`).
//! Every operation here is total; failures are carried inside the returned
//! values (an `ERROR` pre-release tag, a sentinel string, or `None`).

pub mod bundle;
pub mod device;
pub mod version;

pub use bundle::{BundleInfo, BundleInfoSource, BundleValue, FromBundleValue};
pub use device::{Device, DeviceClass, ModelIdentifier, ModelType, ModelVersion};
pub use version::{extract_version, SemanticVersion, VersionError, VersionErrorKind};
