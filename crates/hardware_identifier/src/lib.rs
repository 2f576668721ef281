//! Reads the raw hardware model identifier of the machine, like `"MacBookPro16,1"` or `"iPhone13,2"`.
//!
//! Nothing here interprets the identifier. Providers only fetch it, and a provider that
//! can't produce one yields `None` (after logging why).

use std::ffi::CStr;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("sysctl {name:?} failed: {source}")]
    Sysctl {
        name: &'static CStr,
        #[source]
        source: std::io::Error,
    },
    #[error("uname failed: {0}")]
    Uname(#[source] std::io::Error),
    #[error("environmental variable {0} is not valid unicode")]
    EnvironmentNotUnicode(&'static str),
    #[error("identifier is not valid UTF-8")]
    NotUtf8,
}

/// A source of the raw hardware model identifier.
pub trait RawIdentifierProvider {
    /// Reads the identifier as the platform reports it. `Ok(None)` means this source has no identifier to give.
    fn probe(&self) -> Result<Option<String>, ProbeError>;

    /// Reads the identifier, stripped of control characters. Probe errors are logged and treated as absence.
    fn raw_identifier(&self) -> Option<String> {
        match self.probe() {
            Ok(identifier) => identifier.and_then(normalize),
            Err(error) => {
                tracing::warn!(%error, "could not read hardware model identifier");
                None
            }
        }
    }

    /// Consults `fallback` whenever this provider has nothing (or fails).
    fn with_fallback<P: RawIdentifierProvider>(self, fallback: P) -> Fallback<Self, P> where Self: Sized {
        Fallback(self, fallback)
    }
}

/// Registry values come back with a trailing NUL, and `uname` fields are NUL-padded.
fn normalize(identifier: String) -> Option<String> {
    let trimmed = identifier.trim_matches(char::is_control);
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == identifier.len() {
        Some(identifier)
    } else {
        Some(trimmed.to_owned())
    }
}

impl<T: RawIdentifierProvider + ?Sized> RawIdentifierProvider for &T {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        (**self).probe()
    }
}

impl<T: RawIdentifierProvider + ?Sized> RawIdentifierProvider for Box<T> {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        (**self).probe()
    }
}

/// A fixed identifier, or a fixed absence of one.
impl RawIdentifierProvider for Option<String> {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        Ok(self.clone())
    }
}

/// Tries the first provider, then the second.
#[derive(Debug, Clone)]
pub struct Fallback<A, B>(pub A, pub B);
impl<A: RawIdentifierProvider, B: RawIdentifierProvider> RawIdentifierProvider for Fallback<A, B> {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        match self.0.probe() {
            Ok(Some(identifier)) if !identifier.trim_matches(char::is_control).is_empty() => Ok(Some(identifier)),
            Ok(_) => self.1.probe(),
            Err(error) => {
                tracing::warn!(%error, "could not read hardware model identifier; trying fallback");
                self.1.probe()
            }
        }
    }
}

/// Reads the identifier from an environmental variable.
#[derive(Debug, Clone, Copy)]
pub struct Environment {
    pub variable: &'static str,
}
impl RawIdentifierProvider for Environment {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        match std::env::var_os(self.variable) {
            None => Ok(None),
            Some(value) => value.into_string()
                .map(Some)
                .map_err(|_| ProbeError::EnvironmentNotUnicode(self.variable)),
        }
    }
}

/// Reads a string value through `sysctlbyname`.
#[cfg(target_vendor = "apple")]
#[derive(Debug, Clone, Copy)]
pub struct Sysctl {
    pub name: &'static CStr,
}

#[cfg(target_vendor = "apple")]
impl Sysctl {
    /// The hardware model, like `"MacBookAir9,1"`.
    pub const HW_MODEL: Self = Self { name: c"hw.model" };
    /// The machine type; on iOS devices this is the model identifier.
    pub const HW_MACHINE: Self = Self { name: c"hw.machine" };

    fn last_error(&self) -> Result<Option<String>, ProbeError> {
        let error = std::io::Error::last_os_error();
        if error.raw_os_error() == Some(libc::ENOENT) {
            tracing::debug!(name = ?self.name, "sysctl does not exist");
            return Ok(None)
        }
        Err(ProbeError::Sysctl { name: self.name, source: error })
    }
}

#[cfg(target_vendor = "apple")]
impl RawIdentifierProvider for Sysctl {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        let mut size: libc::size_t = 0;
        if unsafe { libc::sysctlbyname(self.name.as_ptr(), core::ptr::null_mut(), &mut size, core::ptr::null_mut(), 0) } != 0 {
            return self.last_error()
        }

        let mut buffer = vec![0u8; size];
        if unsafe { libc::sysctlbyname(self.name.as_ptr(), buffer.as_mut_ptr().cast(), &mut size, core::ptr::null_mut(), 0) } != 0 {
            return self.last_error()
        }

        buffer.truncate(size);
        if let Some(nul) = buffer.iter().position(|&byte| byte == 0) {
            buffer.truncate(nul);
        }
        String::from_utf8(buffer).map(Some).map_err(|_| ProbeError::NotUtf8)
    }
}

/// Reads the `machine` field of `uname`. On iOS and tvOS devices this is the model identifier;
/// in a simulator it's the host's CPU architecture.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Uname;

#[cfg(unix)]
impl RawIdentifierProvider for Uname {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        let mut info: libc::utsname = unsafe { core::mem::zeroed() };
        if unsafe { libc::uname(&mut info) } != 0 {
            return Err(ProbeError::Uname(std::io::Error::last_os_error()))
        }
        let machine = unsafe { CStr::from_ptr(info.machine.as_ptr()) };
        machine.to_str().map(|machine| Some(machine.to_owned())).map_err(|_| ProbeError::NotUtf8)
    }
}

/// The usual source for the current platform: the `hw.model` sysctl on macOS,
/// `uname` on Apple's other platforms, and nothing elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Platform;

impl RawIdentifierProvider for Platform {
    fn probe(&self) -> Result<Option<String>, ProbeError> {
        #[cfg(target_os = "macos")]
        { Sysctl::HW_MODEL.probe() }
        #[cfg(all(target_vendor = "apple", not(target_os = "macos")))]
        { Uname.probe() }
        #[cfg(not(target_vendor = "apple"))]
        {
            tracing::debug!("no hardware model identifier source for this platform");
            Ok(None)
        }
    }
}
