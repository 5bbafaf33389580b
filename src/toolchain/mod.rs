//! Toolchain discovery capabilities.
//!
//! The option logic never probes the machine itself. It asks a [`Platform`]
//! which setup path to take and asks the [`MsvcResolver`] / [`XcodeResolver`]
//! for compiler versions and system header folders. Host implementations of
//! each live in the submodules; tests and embedders can supply their own.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod msvc;
mod platform;
mod xcode;

pub use msvc::{cl_version_for, HostMsvcResolver};
pub use platform::OsFamily;
pub use xcode::HostXcodeResolver;

/// Error raised by toolchain folder discovery.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("could not find the Xcode {what} folder at `{}`", path.display())]
    FolderNotFound { what: &'static str, path: PathBuf },

    #[error("could not find an Xcode installation: {message}")]
    XcodeNotFound { message: String },
}

/// Host classification used to pick a setup path.
pub trait Platform: Send + Sync {
    /// Unix-like host (Linux, BSD, macOS).
    fn is_unix(&self) -> bool;

    /// macOS host.
    fn is_macos(&self) -> bool;

    /// Windows host.
    fn is_windows(&self) -> bool;
}

/// Visual Studio generations with known compiler versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualStudioVersion {
    Vs2012,
    Vs2013,
    Vs2015,
    Vs2017,
    #[default]
    Latest,
}

impl VisualStudioVersion {
    /// Map a version token such as `"vs2015"` to a version.
    ///
    /// Unknown or missing tokens resolve to [`VisualStudioVersion::Latest`].
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("vs2012") => VisualStudioVersion::Vs2012,
            Some("vs2013") => VisualStudioVersion::Vs2013,
            Some("vs2015") => VisualStudioVersion::Vs2015,
            Some("vs2017") => VisualStudioVersion::Vs2017,
            _ => VisualStudioVersion::Latest,
        }
    }

    /// Get the version token (e.g., "vs2015").
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualStudioVersion::Vs2012 => "vs2012",
            VisualStudioVersion::Vs2013 => "vs2013",
            VisualStudioVersion::Vs2015 => "vs2015",
            VisualStudioVersion::Vs2017 => "vs2017",
            VisualStudioVersion::Latest => "latest",
        }
    }

    /// Internal product major version (VS2015 is 14), `None` for latest.
    pub fn product_major(&self) -> Option<u32> {
        match self {
            VisualStudioVersion::Vs2012 => Some(11),
            VisualStudioVersion::Vs2013 => Some(12),
            VisualStudioVersion::Vs2015 => Some(14),
            VisualStudioVersion::Vs2017 => Some(15),
            VisualStudioVersion::Latest => None,
        }
    }
}

impl std::fmt::Display for VisualStudioVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version of the MSVC compiler (`cl.exe`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClVersion {
    pub major: u32,
    pub minor: u32,
}

impl ClVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        ClVersion { major, minor }
    }

    /// Encode as the tool-set identifier the front end expects.
    ///
    /// Returns `None` when the version has no encoding: a minor version
    /// above 99 would carry into the major digits, and major versions from
    /// 429 on may overflow `u32`.
    pub fn tool_set_id(&self) -> Option<u32> {
        if self.minor >= 100 {
            return None;
        }
        self.major
            .checked_mul(10_000_000)?
            .checked_add(self.minor * 100_000)
    }

    /// Decode a tool-set identifier. Zero means no tool set.
    pub fn from_tool_set_id(id: u32) -> Option<Self> {
        if id == 0 {
            return None;
        }
        Some(ClVersion {
            major: id / 10_000_000,
            minor: (id % 10_000_000) / 100_000,
        })
    }
}

impl std::fmt::Display for ClVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Resolves MSVC compiler versions and system headers.
pub trait MsvcResolver: Send + Sync {
    /// Compiler version shipped with the given Visual Studio generation.
    fn cl_version(&self, vs_version: VisualStudioVersion) -> ClVersion;

    /// System include directories, in header lookup order.
    fn system_includes(&self, vs_version: VisualStudioVersion) -> Vec<PathBuf>;
}

/// Resolves the header folders of an Xcode installation.
pub trait XcodeResolver: Send + Sync {
    /// Clang builtin headers (intrinsics, `stddef.h`, ...).
    fn builtin_includes_folder(&self) -> Result<PathBuf, ToolchainError>;

    /// libc++ headers.
    fn cpp_includes_folder(&self) -> Result<PathBuf, ToolchainError>;

    /// macOS SDK headers.
    fn sdk_includes_folder(&self) -> Result<PathBuf, ToolchainError>;
}

/// The set of capabilities `ParserOptions::setup` consults.
///
/// Carries the Visual Studio choice explicitly so the setup never reads it
/// from process-wide state.
pub struct Host {
    platform: Box<dyn Platform>,
    msvc: Box<dyn MsvcResolver>,
    xcode: Box<dyn XcodeResolver>,
    vs_choice: Option<String>,
}

impl Host {
    /// Create a host from explicit capabilities.
    pub fn new(
        platform: impl Platform + 'static,
        msvc: impl MsvcResolver + 'static,
        xcode: impl XcodeResolver + 'static,
    ) -> Self {
        Host {
            platform: Box::new(platform),
            msvc: Box::new(msvc),
            xcode: Box::new(xcode),
            vs_choice: None,
        }
    }

    /// Capabilities of the machine we are running on.
    pub fn detect() -> Self {
        let platform = OsFamily::host();
        tracing::debug!("Detected host platform: {}", platform);
        Host::new(platform, HostMsvcResolver::new(), HostXcodeResolver::new())
    }

    /// Set the Visual Studio version token used when setup falls back to MSVC.
    pub fn with_vs_choice(mut self, choice: Option<String>) -> Self {
        self.vs_choice = choice;
        self
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    pub fn msvc(&self) -> &dyn MsvcResolver {
        self.msvc.as_ref()
    }

    pub fn xcode(&self) -> &dyn XcodeResolver {
        self.xcode.as_ref()
    }

    pub fn vs_choice(&self) -> Option<&str> {
        self.vs_choice.as_deref()
    }
}
