//! MSVC toolchain discovery.
//!
//! Header lookup order matters: the Universal CRT comes first, then the
//! Windows SDK, then the MSVC headers themselves.

use std::path::{Path, PathBuf};

use crate::util::fs::newest_versioned_dir;
use crate::util::process::{find_executable, ProcessBuilder};

use super::{ClVersion, MsvcResolver, VisualStudioVersion};

/// Compiler version shipped with each Visual Studio generation.
pub fn cl_version_for(vs_version: VisualStudioVersion) -> ClVersion {
    match vs_version {
        VisualStudioVersion::Vs2012 => ClVersion::new(17, 0),
        VisualStudioVersion::Vs2013 => ClVersion::new(18, 0),
        VisualStudioVersion::Vs2015 => ClVersion::new(19, 0),
        VisualStudioVersion::Vs2017 | VisualStudioVersion::Latest => ClVersion::new(19, 10),
    }
}

/// Resolves MSVC headers on the current machine.
///
/// Inside a Developer Command Prompt for the requested generation the
/// `INCLUDE` variable is used as-is. Otherwise the Windows SDK and the
/// Visual Studio installation are located on disk.
#[derive(Debug, Clone, Default)]
pub struct HostMsvcResolver;

impl HostMsvcResolver {
    pub fn new() -> Self {
        HostMsvcResolver
    }
}

impl MsvcResolver for HostMsvcResolver {
    fn cl_version(&self, vs_version: VisualStudioVersion) -> ClVersion {
        cl_version_for(vs_version)
    }

    fn system_includes(&self, vs_version: VisualStudioVersion) -> Vec<PathBuf> {
        if let Some(dirs) = includes_from_env(vs_version) {
            tracing::debug!("Using MSVC includes from the INCLUDE environment variable");
            return dirs;
        }

        let mut dirs = windows_sdk_includes();
        match vc_include_dir(vs_version) {
            Some(vc) => dirs.push(vc),
            None => tracing::warn!(
                "Could not locate MSVC headers for Visual Studio {}",
                vs_version
            ),
        }
        dirs
    }
}

/// Split an `INCLUDE`-style list, keeping order and dropping empty entries.
pub(crate) fn split_include_var(value: &str) -> Vec<PathBuf> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Whether a developer prompt for `VisualStudioVersion=<env>` serves `vs_version`.
pub(crate) fn prompt_matches(
    vs_version: VisualStudioVersion,
    prompt_version: Option<&str>,
) -> bool {
    let Some(wanted) = vs_version.product_major() else {
        return true;
    };
    prompt_version
        .and_then(|v| v.split('.').next())
        .and_then(|major| major.parse::<u32>().ok())
        .is_some_and(|major| major == wanted)
}

fn includes_from_env(vs_version: VisualStudioVersion) -> Option<Vec<PathBuf>> {
    let include = std::env::var("INCLUDE").ok()?;
    let prompt_version = std::env::var("VisualStudioVersion").ok();
    if !prompt_matches(vs_version, prompt_version.as_deref()) {
        tracing::debug!(
            "Ignoring INCLUDE from a developer prompt for Visual Studio {:?}",
            prompt_version
        );
        return None;
    }

    let dirs = split_include_var(&include);
    if dirs.is_empty() {
        None
    } else {
        Some(dirs)
    }
}

/// Windows 10 SDK include folders, UCRT first.
fn windows_sdk_includes() -> Vec<PathBuf> {
    let root = std::env::var("WindowsSdkDir")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let program_files_x86 = std::env::var("ProgramFiles(x86)")
                .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());
            PathBuf::from(program_files_x86).join("Windows Kits").join("10")
        });

    sdk_includes_under(&root)
}

pub(crate) fn sdk_includes_under(sdk_root: &Path) -> Vec<PathBuf> {
    let Some(version_dir) = newest_versioned_dir(&sdk_root.join("Include")) else {
        tracing::debug!("No Windows SDK found under {}", sdk_root.display());
        return Vec::new();
    };

    ["ucrt", "shared", "um", "winrt"]
        .iter()
        .map(|name| version_dir.join(name))
        .filter(|dir| dir.is_dir())
        .collect()
}

fn vc_include_dir(vs_version: VisualStudioVersion) -> Option<PathBuf> {
    match vs_version {
        VisualStudioVersion::Vs2012
        | VisualStudioVersion::Vs2013
        | VisualStudioVersion::Vs2015 => {
            let major = vs_version.product_major()?;
            let tools = std::env::var(format!("VS{}0COMNTOOLS", major)).ok()?;
            let include = PathBuf::from(tools)
                .join("..")
                .join("..")
                .join("VC")
                .join("include");
            include.is_dir().then_some(include)
        }
        VisualStudioVersion::Vs2017 | VisualStudioVersion::Latest => {
            let install = find_vs_installation(vs_version)?;
            msvc_include_under(&install)
        }
    }
}

/// `<install>\VC\Tools\MSVC\<newest>\include`
pub(crate) fn msvc_include_under(install: &Path) -> Option<PathBuf> {
    let tools = install.join("VC").join("Tools").join("MSVC");
    let include = newest_versioned_dir(&tools)?.join("include");
    include.is_dir().then_some(include)
}

/// Locate a Visual Studio 2017+ installation with vswhere.
fn find_vs_installation(vs_version: VisualStudioVersion) -> Option<PathBuf> {
    let Some(vswhere) = find_vswhere() else {
        tracing::debug!("vswhere.exe not found, cannot locate Visual Studio");
        return None;
    };

    let mut cmd = ProcessBuilder::new(&vswhere);
    cmd = match vs_version.product_major() {
        Some(major) => cmd
            .arg("-version")
            .arg(format!("[{}.0,{}.0)", major, major + 1)),
        None => cmd.arg("-latest"),
    };
    cmd = cmd.args([
        "-requires",
        "Microsoft.VisualStudio.Component.VC.Tools.x86.x64",
        "-property",
        "installationPath",
        "-format",
        "value",
    ]);

    match cmd.exec_stdout() {
        Ok(out) => {
            // vswhere prints one installation per line; take the first.
            let path = out.lines().next().map(str::trim).unwrap_or_default();
            if path.is_empty() {
                tracing::debug!("vswhere returned no installation");
                return None;
            }
            tracing::debug!("Found Visual Studio at: {}", path);
            Some(PathBuf::from(path))
        }
        Err(e) => {
            tracing::debug!("Failed to run vswhere: {:#}", e);
            None
        }
    }
}

fn find_vswhere() -> Option<PathBuf> {
    let program_files_x86 = std::env::var("ProgramFiles(x86)")
        .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());

    let standard_path = PathBuf::from(&program_files_x86)
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe");

    if standard_path.exists() {
        return Some(standard_path);
    }

    find_executable("vswhere")
}
