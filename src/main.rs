use bundle_path::{BundleLoadError, BundlePathChoice};
use cli::{Cli, Command, Format};
use hardware_identifier::{Environment, Fallback, Platform, RawIdentifierProvider};
use introspection::BundleInfo;
use report::{BundleReport, DeviceReport, Report, VersionReport};
use util::ferror;

mod bundle_path;
mod cli;
mod debugging;
mod report;
mod util;

/// Overrides the platform's hardware model identifier, but not one passed through a CLI flag.
const HARDWARE_MODEL_ENV_VAR: &str = "INTROSPECT_HARDWARE_MODEL";

fn load_bundle(args: &Cli) -> Option<BundleInfo> {
    let Some(path) = BundlePathChoice::new(args.bundle_path.as_deref()) else {
        return None
    };
    tracing::debug!(path = %path.to_string_lossy(), reason = path.describe_for_choice_reasoning_suffix(), "reading info dictionary snapshot");

    match path.load() {
        Ok(info) => info,
        Err(error) => match error {
            BundleLoadError::NotFound(_) => ferror!("could not read info dictionary: {error} (path was {})", path.describe_for_choice_reasoning_suffix()),
            BundleLoadError::Parse { .. } => ferror!("could not read info dictionary: deserialization failure: {error}"),
            BundleLoadError::PermissionDenied(_) | BundleLoadError::UnknownFs { .. } => ferror!("could not read info dictionary: {error}"),
        }
    }
}

fn raw_identifier(args: &Cli) -> Option<String> {
    let provider = Fallback(
        Fallback(args.identifier.clone(), Environment { variable: HARDWARE_MODEL_ENV_VAR }),
        Platform,
    );
    provider.raw_identifier()
}

fn print(report: &(impl serde::Serialize + core::fmt::Display), format: Format) {
    match report::render(report, format) {
        Ok(rendered) => println!("{rendered}"),
        Err(error) => ferror!("could not serialize output: {error}"),
    }
}

fn main() {
    let args = <Cli as clap::Parser>::parse();
    debugging::init(&args);

    match &args.command {
        Command::Bundle { key: None } => {
            print(&BundleReport::new(&load_bundle(&args)), args.format);
        }
        Command::Bundle { key: Some(key) } => {
            let bundle = load_bundle(&args);
            let Some(value) = introspection::bundle::get::<introspection::BundleValue>(&bundle, key) else {
                ferror!("no value for key {key:?} in the info dictionary")
            };
            match args.format {
                Format::Text => println!("{value}"),
                Format::Json => match serde_json::to_string_pretty(&value) {
                    Ok(rendered) => println!("{rendered}"),
                    Err(error) => ferror!("could not serialize output: {error}"),
                },
            }
        }
        Command::Version { short_version: None, build: None } => {
            let version = introspection::bundle::version(&load_bundle(&args));
            print(&VersionReport::from(version), args.format);
        }
        Command::Version { short_version, build } => {
            let version = introspection::extract_version(short_version.as_deref(), build.as_deref());
            print(&VersionReport::from(version), args.format);
        }
        Command::Device => {
            print(&DeviceReport::new(raw_identifier(&args)), args.format);
        }
        Command::Report => {
            let report = Report {
                bundle: BundleReport::new(&load_bundle(&args)),
                device: DeviceReport::new(raw_identifier(&args)),
            };
            print(&report, args.format);
        }
    }
}
