use clap_verbosity_flag::{Verbosity, WarnLevel};
use clap::{Parser, Subcommand, ValueEnum};

/// Inspect the running bundle's metadata and the device it's running on.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The path to the info dictionary snapshot to load (JSON, or TOML with a `.toml` extension).
    #[arg(short, long = "bundle", value_name = "PATH", global = true)]
    pub bundle_path: Option<std::path::PathBuf>,

    /// Use this hardware model identifier instead of asking the platform.
    #[arg(short, long, value_name = "IDENTIFIER", global = true)]
    pub identifier: Option<String>,

    /// How to print results.
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    pub format: Format,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable lines.
    Text,
    /// A single JSON document.
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the bundle's identifier, name, and version, or the raw value of a single key.
    Bundle {
        /// An info dictionary key, like `LSMinimumSystemVersion`.
        key: Option<String>,
    },
    /// Extract a version from literal strings, or from the loaded bundle if none are given.
    Version {
        /// A short version string, like `2.1`.
        short_version: Option<String>,
        /// A build string, like `1045`.
        build: Option<String>,
    },
    /// Print the hardware model identifier and what it says about the device.
    Device,
    /// Print everything known about the bundle and the device.
    Report,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["introspect", "device", "--identifier", "iPhone13,2", "--format", "json"]).unwrap();
        assert_eq!(cli.identifier.as_deref(), Some("iPhone13,2"));
        assert_eq!(cli.format, Format::Json);
        assert!(matches!(cli.command, Command::Device));
    }

    #[test]
    fn version_positionals() {
        let cli = Cli::try_parse_from(["introspect", "version", "2.1", "1045"]).unwrap();
        let Command::Version { short_version, build } = cli.command else { panic!("expected the version subcommand") };
        assert_eq!(short_version.as_deref(), Some("2.1"));
        assert_eq!(build.as_deref(), Some("1045"));

        let cli = Cli::try_parse_from(["introspect", "-b", "Info.json", "version"]).unwrap();
        assert_eq!(cli.bundle_path.as_deref(), Some(std::path::Path::new("Info.json")));
        assert!(matches!(cli.command, Command::Version { short_version: None, build: None }));
    }
}
