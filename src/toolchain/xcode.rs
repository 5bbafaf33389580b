//! Xcode toolchain discovery.
//!
//! Works with both a full Xcode install and the standalone Command Line
//! Tools, whose developer directory has no `Toolchains/` or `Platforms/`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::util::fs::{list_subdirs, newest_versioned_dir};
use crate::util::process::ProcessBuilder;

use super::{ToolchainError, XcodeResolver};

const DEFAULT_DEVELOPER_DIR: &str = "/Applications/Xcode.app/Contents/Developer";

/// Resolves Xcode header folders on the current machine.
///
/// The developer directory is located on first use and reused for every
/// later folder lookup.
#[derive(Debug, Clone)]
pub struct HostXcodeResolver {
    developer_dir: OnceLock<PathBuf>,
    detect: fn() -> PathBuf,
}

impl HostXcodeResolver {
    /// Locate the developer directory via `DEVELOPER_DIR` or `xcode-select`.
    pub fn new() -> Self {
        HostXcodeResolver {
            developer_dir: OnceLock::new(),
            detect: detect_developer_dir,
        }
    }

    /// Use an explicit developer directory (e.g. `.../Xcode.app/Contents/Developer`).
    pub fn with_developer_dir(dir: impl Into<PathBuf>) -> Self {
        HostXcodeResolver {
            developer_dir: OnceLock::from(dir.into()),
            detect: detect_developer_dir,
        }
    }

    fn developer_dir(&self) -> Result<PathBuf, ToolchainError> {
        let dir = self.developer_dir.get_or_init(self.detect);

        if dir.is_dir() {
            Ok(dir.clone())
        } else {
            Err(ToolchainError::XcodeNotFound {
                message: format!("developer directory `{}` does not exist", dir.display()),
            })
        }
    }

    fn toolchain_dir(&self) -> Result<PathBuf, ToolchainError> {
        let developer = self.developer_dir()?;
        let toolchains = developer.join("Toolchains");

        let default = toolchains.join("XcodeDefault.xctoolchain");
        if default.is_dir() {
            return Ok(default);
        }
        if let Some(first) = list_subdirs(&toolchains).into_iter().next() {
            return Ok(first);
        }

        // Command Line Tools keep usr/ directly in the developer directory.
        Ok(developer)
    }

    fn sdk_dir(&self) -> Result<PathBuf, ToolchainError> {
        let developer = self.developer_dir()?;
        let platform_sdks = developer
            .join("Platforms")
            .join("MacOSX.platform")
            .join("Developer")
            .join("SDKs");
        let sdks = if platform_sdks.is_dir() {
            platform_sdks
        } else {
            developer.join("SDKs")
        };

        pick_macos_sdk(&sdks).ok_or(ToolchainError::FolderNotFound {
            what: "SDK",
            path: sdks,
        })
    }
}

impl Default for HostXcodeResolver {
    fn default() -> Self {
        HostXcodeResolver::new()
    }
}

impl XcodeResolver for HostXcodeResolver {
    fn builtin_includes_folder(&self) -> Result<PathBuf, ToolchainError> {
        let clang = self.toolchain_dir()?.join("usr").join("lib").join("clang");
        let include = newest_versioned_dir(&clang).map(|dir| dir.join("include"));

        match include {
            Some(include) if include.is_dir() => Ok(include),
            _ => Err(ToolchainError::FolderNotFound {
                what: "builtin includes",
                path: clang,
            }),
        }
    }

    fn cpp_includes_folder(&self) -> Result<PathBuf, ToolchainError> {
        let toolchain_cpp = cpp_include_under(&self.toolchain_dir()?);
        if toolchain_cpp.is_dir() {
            return Ok(toolchain_cpp);
        }

        // Newer Xcode releases only ship libc++ headers inside the SDK.
        if let Ok(sdk) = self.sdk_dir() {
            let sdk_cpp = cpp_include_under(&sdk);
            if sdk_cpp.is_dir() {
                return Ok(sdk_cpp);
            }
        }

        Err(ToolchainError::FolderNotFound {
            what: "C++ includes",
            path: toolchain_cpp,
        })
    }

    fn sdk_includes_folder(&self) -> Result<PathBuf, ToolchainError> {
        let include = self.sdk_dir()?.join("usr").join("include");
        if include.is_dir() {
            Ok(include)
        } else {
            Err(ToolchainError::FolderNotFound {
                what: "SDK includes",
                path: include,
            })
        }
    }
}

fn cpp_include_under(root: &Path) -> PathBuf {
    root.join("usr").join("include").join("c++").join("v1")
}

/// Prefer the unversioned `MacOSX.sdk`, else the first `MacOSX*.sdk`.
fn pick_macos_sdk(sdks: &Path) -> Option<PathBuf> {
    let unversioned = sdks.join("MacOSX.sdk");
    if unversioned.is_dir() {
        return Some(unversioned);
    }

    list_subdirs(sdks).into_iter().find(|dir| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("MacOSX") && n.ends_with(".sdk"))
    })
}

fn detect_developer_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DEVELOPER_DIR") {
        return PathBuf::from(dir);
    }

    match ProcessBuilder::new("xcode-select").arg("-p").exec_stdout() {
        Ok(out) if !out.is_empty() => {
            tracing::debug!("xcode-select reports developer dir: {}", out);
            PathBuf::from(out)
        }
        Ok(_) => PathBuf::from(DEFAULT_DEVELOPER_DIR),
        Err(e) => {
            tracing::debug!("Failed to run xcode-select: {:#}", e);
            PathBuf::from(DEFAULT_DEVELOPER_DIR)
        }
    }
}
