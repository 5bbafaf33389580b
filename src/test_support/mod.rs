//! Test utilities and mocks for cxxparse unit tests.
//!
//! Provides resolvers that answer from fixed data so option setup can be
//! tested for any host family without a real MSVC or Xcode install.
//!
//! # Example
//!
//! ```rust,ignore
//! use cxxparse::test_support::{mock_host, MockMsvcResolver};
//!
//! #[test]
//! fn test_example() {
//!     let host = mock_host(OsFamily::Windows);
//!     let mut opts = ParserOptions::new(host.platform());
//!     opts.setup(&host).unwrap();
//! }
//! ```

use std::path::PathBuf;

use crate::toolchain::{
    cl_version_for, ClVersion, Host, MsvcResolver, OsFamily, ToolchainError,
    VisualStudioVersion, XcodeResolver,
};

/// MSVC resolver with fixed include directories.
///
/// Without explicit includes it answers `C:/<vs>/ucrt`, `C:/<vs>/um` and
/// `C:/<vs>/msvc/include` for the requested version.
#[derive(Debug, Clone, Default)]
pub struct MockMsvcResolver {
    includes: Option<Vec<PathBuf>>,
    cl_version: Option<ClVersion>,
}

impl MockMsvcResolver {
    pub fn new() -> Self {
        MockMsvcResolver {
            includes: None,
            cl_version: None,
        }
    }

    /// Always answer with the given include directories.
    pub fn with_includes(includes: Vec<PathBuf>) -> Self {
        MockMsvcResolver {
            includes: Some(includes),
            cl_version: None,
        }
    }

    /// Report `cl_version` for every Visual Studio generation.
    pub fn with_cl_version(cl_version: ClVersion) -> Self {
        MockMsvcResolver {
            includes: None,
            cl_version: Some(cl_version),
        }
    }
}

impl MsvcResolver for MockMsvcResolver {
    fn cl_version(&self, vs_version: VisualStudioVersion) -> ClVersion {
        self.cl_version.unwrap_or_else(|| cl_version_for(vs_version))
    }

    fn system_includes(&self, vs_version: VisualStudioVersion) -> Vec<PathBuf> {
        if let Some(includes) = &self.includes {
            return includes.clone();
        }

        ["ucrt", "um", "msvc/include"]
            .iter()
            .map(|dir| PathBuf::from(format!("C:/{}/{}", vs_version.as_str(), dir)))
            .collect()
    }
}

/// Xcode resolver with fixed folders, optionally failing one lookup.
#[derive(Debug, Clone, Default)]
pub struct MockXcodeResolver {
    missing: Option<&'static str>,
}

impl MockXcodeResolver {
    pub const BUILTIN: &'static str = "/xcode/usr/lib/clang/15.0.0/include";
    pub const CPP: &'static str = "/xcode/usr/include/c++/v1";
    pub const SDK: &'static str = "/xcode/SDKs/MacOSX.sdk/usr/include";

    pub fn new() -> Self {
        MockXcodeResolver { missing: None }
    }

    /// Fail the lookup named `what` ("builtin includes", "C++ includes" or
    /// "SDK includes").
    pub fn missing(what: &'static str) -> Self {
        MockXcodeResolver {
            missing: Some(what),
        }
    }

    fn lookup(&self, what: &'static str, path: &str) -> Result<PathBuf, ToolchainError> {
        if self.missing == Some(what) {
            return Err(ToolchainError::FolderNotFound {
                what,
                path: PathBuf::from(path),
            });
        }
        Ok(PathBuf::from(path))
    }
}

impl XcodeResolver for MockXcodeResolver {
    fn builtin_includes_folder(&self) -> Result<PathBuf, ToolchainError> {
        self.lookup("builtin includes", Self::BUILTIN)
    }

    fn cpp_includes_folder(&self) -> Result<PathBuf, ToolchainError> {
        self.lookup("C++ includes", Self::CPP)
    }

    fn sdk_includes_folder(&self) -> Result<PathBuf, ToolchainError> {
        self.lookup("SDK includes", Self::SDK)
    }
}

/// A host of the given family backed by the mock resolvers.
pub fn mock_host(family: OsFamily) -> Host {
    Host::new(family, MockMsvcResolver::new(), MockXcodeResolver::new())
}
