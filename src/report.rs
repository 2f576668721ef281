use introspection::{bundle, BundleInfoSource, Device, DeviceClass, ModelType, ModelVersion, SemanticVersion, VersionError};
use serde::Serialize;

use crate::cli::Format;

/// Render a report in the requested format. Text output ends without a trailing newline.
pub fn render<T: Serialize + core::fmt::Display>(report: &T, format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(report.to_string()),
        Format::Json => serde_json::to_string_pretty(report),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionReport {
    pub version: SemanticVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VersionErrorReport>,
}
impl From<SemanticVersion> for VersionReport {
    fn from(version: SemanticVersion) -> Self {
        let error = version.error().map(VersionErrorReport::from);
        Self { version, error }
    }
}
impl core::fmt::Display for VersionReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "version: {}", self.version)?;
        if let Some(error) = &self.error {
            write!(f, "\nversion error: {} ({})", error.kind, error.key)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct VersionErrorReport {
    pub kind: &'static str,
    pub key: String,
}
impl From<VersionError> for VersionErrorReport {
    fn from(error: VersionError) -> Self {
        Self { kind: error.kind.into(), key: error.key }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleReport {
    pub identifier: String,
    pub name: String,
    #[serde(flatten)]
    pub version: VersionReport,
}
impl BundleReport {
    pub fn new(source: &impl BundleInfoSource) -> Self {
        Self {
            identifier: bundle::id(source),
            name: bundle::name(source),
            version: bundle::version(source).into(),
        }
    }
}
impl core::fmt::Display for BundleReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "identifier: {}", self.identifier)?;
        writeln!(f, "name: {}", self.name)?;
        write!(f, "{}", self.version)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
    /// The raw hardware model identifier, if the platform gave one.
    pub identifier: Option<String>,
    pub model_type: ModelType,
    pub model_version: Option<ModelVersion>,
    pub device_class: Option<DeviceClass>,
    pub is_simulator: bool,
    pub is_virtual_machine: bool,
}
impl DeviceReport {
    pub fn new(identifier: Option<String>) -> Self {
        let parsed = introspection::device::parse_model_identifier(identifier.as_deref());
        let device = Device::from(parsed.model_type);
        Self {
            identifier,
            model_version: parsed.version,
            device_class: device.device_class(),
            is_simulator: device.is_simulator(),
            is_virtual_machine: device.is_virtual_machine(),
            model_type: device.model_type().clone(),
        }
    }
}
impl core::fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "identifier: {}", self.identifier.as_deref().unwrap_or("(none)"))?;
        writeln!(f, "model type: {}", self.model_type)?;
        if let Some(version) = self.model_version {
            writeln!(f, "model version: {version}")?;
        }
        match self.device_class {
            Some(class) => writeln!(f, "device class: {class}")?,
            None => writeln!(f, "device class: (unknown)")?,
        }
        writeln!(f, "simulator: {}", self.is_simulator)?;
        write!(f, "virtual machine: {}", self.is_virtual_machine)
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub bundle: BundleReport,
    pub device: DeviceReport,
}
impl core::fmt::Display for Report {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "[bundle]\n{}\n", self.bundle)?;
        write!(f, "[device]\n{}", self.device)
    }
}
