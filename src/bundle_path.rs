use std::{borrow::Cow, path::{Path, PathBuf}};

use introspection::BundleInfo;

macro_rules! get_path_env_var { () => { "INTROSPECT_BUNDLE" } }
pub static PATH_ENV_VAR: &str = get_path_env_var!();

/// Where the snapshot sits relative to the executable: `Foo.app/Contents/MacOS/foo` reads `Foo.app/Contents/Info.json`.
const POST_CONTENTS_DEFAULT_PATH: &str = "Info.json";

/// How the user specified (or did not specify) the info dictionary snapshot path.
#[derive(Clone, Debug)]
pub enum BundlePathChoice<'a> {
    /// Explicitly provided by a flag in the CLI.
    /// This has the highest priority, and overrides the environmental variable and default path.
    Explicit(&'a Path),
    /// Inferred based on an environmental variable.
    /// This has the second-highest priority, overriding the default path but not one passed through a CLI flag.
    Environmental(std::ffi::OsString),
    /// Automatically determined from the location of the running executable, as the `Contents` directory of the bundle it's in.
    Automatic(PathBuf),
}
impl<'a> BundlePathChoice<'a> {
    /// Returns `None` only if no path was given and the executable's location can't be determined.
    pub fn new(explicit: Option<&'a Path>) -> Option<BundlePathChoice<'a>> {
        if let Some(explicit) = explicit {
            Some(Self::Explicit(explicit))
        } else if let Some(environmental) = std::env::var_os(PATH_ENV_VAR) {
            Some(Self::Environmental(environmental))
        } else {
            Self::automatic()
        }
    }

    pub fn automatic() -> Option<Self> {
        let executable = match std::env::current_exe() {
            Ok(executable) => executable,
            Err(error) => {
                tracing::debug!(%error, "cannot locate the running executable");
                return None
            }
        };
        Self::automatic_for(&executable)
    }

    fn automatic_for(executable: &Path) -> Option<Self> {
        let contents = executable.parent()?.parent()?;
        Some(Self::Automatic(contents.join(POST_CONTENTS_DEFAULT_PATH)))
    }

    pub fn as_path(&self) -> &Path {
        match self {
            Self::Explicit(explicit) => explicit,
            Self::Environmental(environmental) => Path::new(environmental),
            Self::Automatic(automatic) => automatic
        }
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        self.as_path().to_string_lossy()
    }

    pub const fn describe_for_choice_reasoning_suffix(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicitly provided",
            Self::Automatic(_) => "next to the running executable",
            Self::Environmental(_) => concat!("sourced from the ", get_path_env_var!(), " environmental variable")
        }
    }

    pub const fn was_auto(&self) -> bool {
        matches!(self, Self::Automatic(..))
    }

    /// Read and parse the snapshot. A snapshot that was only looked for automatically and doesn't exist is `Ok(None)`.
    pub fn load(&self) -> Result<Option<BundleInfo>, BundleLoadError> {
        let path = self.as_path();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound && self.was_auto() => {
                tracing::debug!(path = %self.to_string_lossy(), "no info dictionary snapshot next to the executable");
                return Ok(None)
            }
            Err(error) => return Err(BundleLoadError::from_io(path, error)),
        };

        let parsed = match SnapshotFormat::of(path) {
            SnapshotFormat::Toml => BundleInfo::from_toml_str(&text),
            SnapshotFormat::Json => BundleInfo::from_json_str(&text),
        };

        match parsed {
            Ok(info) => {
                tracing::debug!(path = %self.to_string_lossy(), keys = info.len(), "loaded info dictionary snapshot");
                Ok(Some(info))
            }
            Err(inner) => Err(BundleLoadError::Parse { path: path.to_owned(), inner }),
        }
    }
}
impl AsRef<Path> for BundlePathChoice<'_> {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotFormat {
    Json,
    Toml,
}
impl SnapshotFormat {
    fn of(path: &Path) -> Self {
        match path.extension() {
            Some(extension) if extension.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BundleLoadError {
    #[error("lacking permission to read {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("unknown io error reading {}: {inner}", path.display())]
    UnknownFs {
        path: PathBuf,
        #[source]
        inner: std::io::Error,
    },
    #[error("could not parse {}: {inner}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        inner: introspection::bundle::LoadError,
    },
}
impl BundleLoadError {
    fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_owned()),
            ErrorKind::NotFound => Self::NotFound(path.to_owned()),
            _ => Self::UnknownFs { path: path.to_owned(), inner: error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("introspect-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn explicit_wins() {
        let path = Path::new("/tmp/Info.json");
        assert!(matches!(BundlePathChoice::new(Some(path)), Some(BundlePathChoice::Explicit(explicit)) if explicit == path));
    }

    #[test]
    fn automatic_location() {
        let choice = BundlePathChoice::automatic_for(Path::new("/Applications/Foo.app/Contents/MacOS/foo")).unwrap();
        assert!(choice.was_auto());
        assert_eq!(choice.as_path(), Path::new("/Applications/Foo.app/Contents/Info.json"));
        assert!(BundlePathChoice::automatic_for(Path::new("/foo")).is_none());
    }

    #[test]
    fn format_by_extension() {
        assert_eq!(SnapshotFormat::of(Path::new("Info.toml")), SnapshotFormat::Toml);
        assert_eq!(SnapshotFormat::of(Path::new("Info.TOML")), SnapshotFormat::Toml);
        assert_eq!(SnapshotFormat::of(Path::new("Info.json")), SnapshotFormat::Json);
        assert_eq!(SnapshotFormat::of(Path::new("Info")), SnapshotFormat::Json);
    }

    #[test]
    fn load_snapshots() {
        let json = scratch("Info.json", r#"{"CFBundleIdentifier": "com.example.App", "CFBundleShortVersionString": "2.1"}"#);
        let info = BundlePathChoice::Explicit(&json).load().unwrap().unwrap();
        assert_eq!(introspection::bundle::id(&info), "com.example.App");
        assert_eq!(introspection::bundle::version(&info).to_string(), "2.1.0");
        std::fs::remove_file(&json).unwrap();

        let toml = scratch("Info.toml", "CFBundleName = \"Example\"\n");
        let info = BundlePathChoice::Explicit(&toml).load().unwrap().unwrap();
        assert_eq!(introspection::bundle::name(&info), "Example");
        std::fs::remove_file(&toml).unwrap();
    }

    #[test]
    fn missing_snapshot() {
        let missing = std::env::temp_dir().join("introspect-surely-missing/Info.json");
        assert!(matches!(BundlePathChoice::Explicit(&missing).load(), Err(BundleLoadError::NotFound(_))));
        assert!(matches!(BundlePathChoice::Environmental(missing.clone().into()).load(), Err(BundleLoadError::NotFound(_))));
        assert!(matches!(BundlePathChoice::Automatic(missing).load(), Ok(None)));
    }

    #[test]
    fn malformed_snapshot() {
        let path = scratch("Malformed.json", "[1, 2, 3]");
        assert!(matches!(BundlePathChoice::Explicit(&path).load(), Err(BundleLoadError::Parse { .. })));
        std::fs::remove_file(&path).unwrap();
    }
}
