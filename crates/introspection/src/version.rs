use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

/// The info dictionary key holding the `major.minor.patch` portion of a bundle's version.
pub const SHORT_VERSION_KEY: &str = "CFBundleShortVersionString";
/// The info dictionary key holding a bundle's build number.
pub const BUILD_VERSION_KEY: &str = "CFBundleVersion";

/// The first pre-release identifier of every error sentinel.
pub const ERROR_TAG: &str = "ERROR";

/// Why a version couldn't be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::IntoStaticStr)]
pub enum VersionErrorKind {
    /// The key was absent from the info dictionary.
    #[strum(serialize = "BundleInfoDictionaryValueNotFound")]
    ValueNotFound,
    /// The key was present, but its value wasn't a version even after filling in missing components.
    #[strum(serialize = "BundleInfoDictionaryValueInvalidFormat")]
    ValueInvalidFormat,
}

/// An error decoded from the pre-release identifiers of a sentinel version.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} ({key})")]
pub struct VersionError {
    pub kind: VersionErrorKind,
    /// The info dictionary key the error is about, like `CFBundleShortVersionString`.
    pub key: String,
}

/// A semantic version, `major.minor.patch[-preRelease][+build]`.
///
/// Build metadata is informational: it is rendered, but it takes no part in equality, ordering, or hashing.
#[derive(Debug, Clone)]
pub struct SemanticVersion(semver::Version);

impl SemanticVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Creates the `0.0.0-ERROR.<kind>.<key>` version used in place of a failure.
    ///
    /// The key must be a valid SemVer identifier; if it isn't, it is left out of the sentinel.
    pub fn error_sentinel(kind: VersionErrorKind, key: &str) -> Self {
        let kind: &'static str = kind.into();
        let pre = semver::Prerelease::new(&format!("{ERROR_TAG}.{kind}.{key}"))
            .or_else(|_| semver::Prerelease::new(&format!("{ERROR_TAG}.{kind}")))
            .unwrap_or_default();
        let mut version = semver::Version::new(0, 0, 0);
        version.pre = pre;
        Self(version)
    }

    /// Parses a version that may be missing its patch, or both its minor and patch components.
    ///
    /// `"1.2.3"` is tried as-is, then `"1.2"` as `"1.2.0"`, then `"1"` as `"1.0.0"`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        const TIERS: [(&str, &str); 3] = [
            ("major.minor.patch", ""),
            ("major.minor", ".0"),
            ("major", ".0.0"),
        ];

        for (shape, suffix) in TIERS {
            match semver::Version::parse(&format!("{raw}{suffix}")) {
                Ok(version) => {
                    tracing::debug!(raw, shape, "parsed version");
                    return Some(Self(version))
                }
                Err(error) => tracing::trace!(raw, shape, %error, "version did not parse")
            }
        }

        None
    }

    /// Replaces the build metadata with the given string.
    /// An empty string clears it, and a string that isn't valid build metadata is discarded.
    pub fn with_build(mut self, build: &str) -> Self {
        if build.is_empty() {
            self.0.build = semver::BuildMetadata::EMPTY;
            return self
        }

        match semver::BuildMetadata::new(build) {
            Ok(metadata) => self.0.build = metadata,
            Err(error) => tracing::warn!(build, %error, "discarding build string that isn't valid build metadata"),
        }
        self
    }

    pub fn major(&self) -> u64 { self.0.major }
    pub fn minor(&self) -> u64 { self.0.minor }
    pub fn patch(&self) -> u64 { self.0.patch }

    pub fn pre_release(&self) -> &semver::Prerelease {
        &self.0.pre
    }

    pub fn build(&self) -> &semver::BuildMetadata {
        &self.0.build
    }

    /// The dot-separated pre-release identifiers, in order.
    pub fn pre_release_identifiers(&self) -> impl Iterator<Item = &str> {
        identifiers(self.0.pre.as_str())
    }

    /// The dot-separated build identifiers, in order.
    pub fn build_identifiers(&self) -> impl Iterator<Item = &str> {
        identifiers(self.0.build.as_str())
    }

    /// Whether this version is an error sentinel, which is to say its first pre-release identifier is `ERROR`.
    pub fn is_error(&self) -> bool {
        self.pre_release_identifiers().next() == Some(ERROR_TAG)
    }

    /// Decodes the error carried by a sentinel version.
    pub fn error(&self) -> Option<VersionError> {
        let mut identifiers = self.pre_release_identifiers();
        if identifiers.next() != Some(ERROR_TAG) {
            return None
        }
        let kind = identifiers.next()?.parse().ok()?;
        let key = identifiers.next()?.to_owned();
        Some(VersionError { kind, key })
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }

    pub fn into_inner(self) -> semver::Version {
        self.0
    }
}

fn identifiers(dotted: &str) -> impl Iterator<Item = &str> {
    dotted.split('.').filter(|identifier| !identifier.is_empty())
}

/// Builds a version from a bundle's short version string and build string.
///
/// This never fails. If the short version string is absent the result is
/// `0.0.0-ERROR.BundleInfoDictionaryValueNotFound.CFBundleShortVersionString`,
/// and if it can't be parsed (see [`SemanticVersion::parse_lenient`]) the result is
/// `0.0.0-ERROR.BundleInfoDictionaryValueInvalidFormat.CFBundleShortVersionString`.
/// A non-empty build string becomes the build metadata; it never affects success.
pub fn extract_version(short_version: Option<&str>, build: Option<&str>) -> SemanticVersion {
    let Some(short_version) = short_version else {
        return SemanticVersion::error_sentinel(VersionErrorKind::ValueNotFound, SHORT_VERSION_KEY)
    };

    let Some(version) = SemanticVersion::parse_lenient(short_version) else {
        tracing::debug!(short_version, "short version string is not a version");
        return SemanticVersion::error_sentinel(VersionErrorKind::ValueInvalidFormat, SHORT_VERSION_KEY)
    };

    match build {
        Some(build) if !build.is_empty() => version.with_build(build),
        _ => version,
    }
}

impl From<semver::Version> for SemanticVersion {
    fn from(version: semver::Version) -> Self {
        Self(version)
    }
}
impl AsRef<semver::Version> for SemanticVersion {
    fn as_ref(&self) -> &semver::Version {
        &self.0
    }
}
impl core::str::FromStr for SemanticVersion {
    type Err = semver::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        semver::Version::parse(s).map(Self)
    }
}
impl core::fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for SemanticVersion {}
impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.major.cmp(&other.0.major)
            .then_with(|| self.0.minor.cmp(&other.0.minor))
            .then_with(|| self.0.patch.cmp(&other.0.patch))
            .then_with(|| self.0.pre.cmp(&other.0.pre))
    }
}
impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.major.hash(state);
        self.0.minor.hash(state);
        self.0.patch.hash(state);
        self.0.pre.hash(state);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SemanticVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SemanticVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre(version: &SemanticVersion) -> Vec<&str> {
        version.pre_release_identifiers().collect()
    }

    #[test]
    fn missing_short_version() {
        let version = extract_version(None, Some("456"));
        assert_eq!((version.major(), version.minor(), version.patch()), (0, 0, 0));
        assert_eq!(pre(&version), ["ERROR", "BundleInfoDictionaryValueNotFound", "CFBundleShortVersionString"]);
        assert_eq!(version.to_string(), "0.0.0-ERROR.BundleInfoDictionaryValueNotFound.CFBundleShortVersionString");
        assert!(version.build().is_empty(), "no build is attached to a sentinel");
    }

    #[test]
    fn invalid_short_version() {
        let version = extract_version(Some("not-a-version"), None);
        assert_eq!(version.to_string(), "0.0.0-ERROR.BundleInfoDictionaryValueInvalidFormat.CFBundleShortVersionString");

        for raw in ["", "1.2.3.4", "v1.2", "1..2", "one.two"] {
            let version = extract_version(Some(raw), Some("9"));
            assert_eq!(pre(&version), ["ERROR", "BundleInfoDictionaryValueInvalidFormat", "CFBundleShortVersionString"], "{raw:?}");
        }
    }

    #[test]
    fn fallback_tiers() {
        assert_eq!(extract_version(Some("1.2.3"), None), SemanticVersion::new(1, 2, 3));
        assert_eq!(extract_version(Some("1.2"), Some("")), SemanticVersion::new(1, 2, 0));
        assert_eq!(extract_version(Some("7"), None), SemanticVersion::new(7, 0, 0));
        assert_eq!(extract_version(Some("1.2"), Some("")).build_identifiers().count(), 0);

        let pre_release = extract_version(Some("2.0.0-beta.3"), None);
        assert_eq!(pre(&pre_release), ["beta", "3"]);
    }

    #[test]
    fn build_string() {
        let version = extract_version(Some("1.2.3"), Some("456"));
        assert_eq!(version.to_string(), "1.2.3+456");
        assert_eq!(version.build_identifiers().collect::<Vec<_>>(), ["456"]);

        assert_eq!(extract_version(Some("14.1"), Some("1A2b")).to_string(), "14.1.0+1A2b");
        assert_eq!(extract_version(Some("1.0"), Some("12 (beta)")).to_string(), "1.0.0", "invalid build metadata is dropped");
    }

    #[test]
    fn build_is_not_identity() {
        let a = extract_version(Some("1.2.3"), Some("1"));
        let b = extract_version(Some("1.2.3"), Some("2"));
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn ordering() {
        let sentinel = extract_version(None, None);
        assert!(sentinel < SemanticVersion::new(0, 0, 0), "pre-releases precede their release");
        assert!(SemanticVersion::new(1, 0, 0) > SemanticVersion::new(0, 99, 99));
        let parse = |raw: &str| raw.parse::<SemanticVersion>().unwrap();
        assert!(parse("1.0.0-alpha") < parse("1.0.0-beta"));
        assert!(parse("1.0.0-2") < parse("1.0.0-10"));
    }

    #[test]
    fn decode_error() {
        assert_eq!(extract_version(None, None).error(), Some(VersionError {
            kind: VersionErrorKind::ValueNotFound,
            key: SHORT_VERSION_KEY.to_owned(),
        }));
        assert_eq!(extract_version(Some("x"), None).error().map(|error| error.kind), Some(VersionErrorKind::ValueInvalidFormat));

        let fine = extract_version(Some("1.0.0-beta"), None);
        assert!(!fine.is_error());
        assert_eq!(fine.error(), None);
        assert!(!"1.0.0-ERRORS.x".parse::<SemanticVersion>().unwrap().is_error());
        assert!("1.0.0-ERROR".parse::<SemanticVersion>().unwrap().is_error());
    }

    #[test]
    fn rendering_reparses() {
        let inputs = [
            (Some("1.2.3"), Some("456")),
            (Some("1.2"), None),
            (Some("3"), Some("")),
            (Some("4.5.6-rc.1"), Some("build.7")),
            (Some("garbage"), None),
            (None, None),
        ];
        for (short_version, build) in inputs {
            let version = extract_version(short_version, build);
            let reparsed = SemanticVersion::parse_lenient(&version.to_string()).expect("rendering is a valid version");
            assert_eq!(reparsed, version);
            assert_eq!(reparsed.build(), version.build());
        }
    }
}
