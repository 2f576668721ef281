use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::DeviceClass;

/// A device's hardware model type, like `"MacBookPro"` or `"iPad"`.
///
/// This is the hardware model identifier with its version numbers removed, or the whole identifier if it isn't in Apple's format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ModelType(Cow<'static, str>);

impl ModelType {
    /// A placeholder for when the model type cannot be identified.
    pub const UNKNOWN: Self = Self::from_static("__UNKNOWN__");

    pub fn new(model_type: impl Into<Cow<'static, str>>) -> Self {
        Self(model_type.into())
    }

    pub const fn from_static(model_type: &'static str) -> Self {
        Self(Cow::Borrowed(model_type))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// The class of device indicated by this model type, or `None` if that can't be determined.
    pub fn device_class(&self) -> Option<DeviceClass> {
        super::classify(self)
    }

    pub fn is_simulator(&self) -> bool {
        super::is_simulator(self)
    }

    pub fn is_virtual_machine(&self) -> bool {
        super::is_virtual_machine(self)
    }
}

impl AsRef<str> for ModelType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
impl PartialEq<str> for ModelType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}
impl PartialEq<&str> for ModelType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
impl core::fmt::Display for ModelType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numbers that follow the model type in a hardware model identifier, like `9,1` in `"MacBookAir9,1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelVersion {
    pub major: u32,
    pub minor: u32,
}
impl core::fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.major, self.minor)
    }
}

/// A parsed hardware model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct ModelIdentifier {
    pub model_type: ModelType,
    /// Absent when the identifier isn't in Apple's format, or when a number doesn't fit in a `u32`.
    pub version: Option<ModelVersion>,
}
impl core::fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.model_type)?;
        if let Some(version) = self.version {
            write!(f, "{version}")?;
        }
        Ok(())
    }
}

/// Splits something like `"MacBookAir9,1"` into `Type` (`"MacBookAir"`), `MajorVersion` (`"9"`), and `MinorVersion` (`"1"`).
static HARDWARE_MODEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<Type>\w+?)(?<Version>(?<MajorVersion>\d+),(?<MinorVersion>\d+))$").expect("hardware model pattern should compile")
});

/// Parses a raw hardware model identifier, like `"MacBookAir9,1"` or `"iPhone13,2"`.
///
/// `None` gives [`ModelType::UNKNOWN`]. An identifier that isn't a word followed by
/// `<digits>,<digits>` (like the `"x86_64"` reported by a simulator) is kept whole as the model type.
pub fn parse_model_identifier(raw: Option<&str>) -> ModelIdentifier {
    let Some(raw) = raw else {
        return ModelIdentifier { model_type: ModelType::UNKNOWN, version: None }
    };

    let Some((model_type, major, minor)) = HARDWARE_MODEL_PATTERN.captures(raw).and_then(|captures| Some((
        captures.name("Type")?.as_str(),
        captures.name("MajorVersion")?.as_str(),
        captures.name("MinorVersion")?.as_str(),
    ))) else {
        tracing::debug!(raw, "not an Apple-format hardware model identifier; using it whole");
        return ModelIdentifier { model_type: ModelType::new(raw.to_owned()), version: None }
    };

    let version = match (major.parse(), minor.parse()) {
        (Ok(major), Ok(minor)) => Some(ModelVersion { major, minor }),
        _ => {
            tracing::debug!(raw, major, minor, "hardware model version is out of range");
            None
        }
    };

    ModelIdentifier { model_type: ModelType::new(model_type.to_owned()), version }
}

/// Parses a raw hardware model identifier into just its model type. See [`parse_model_identifier`].
pub fn parse_model_token(raw: Option<&str>) -> ModelType {
    parse_model_identifier(raw).model_type
}
