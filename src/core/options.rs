//! Parser option state.
//!
//! [`ParserOptions`] holds everything the native front end needs to parse a
//! translation unit the way a particular compiler would: ABI, language
//! standard, compatibility flags and system header search order.
//!
//! Typical use:
//!
//! ```ignore
//! let host = Host::detect();
//! let mut opts = ParserOptions::new(host.platform());
//! opts.language_version = LanguageVersion::CPlusPlus11;
//! opts.setup(&host)?;
//! let argv = opts.command_line();
//! ```
//!
//! Arguments and include directories are append-only and keep insertion
//! order; earlier include directories shadow later ones. Setup routines are
//! not idempotent.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::abi::CppAbi;
use crate::core::language::LanguageVersion;
use crate::toolchain::{
    ClVersion, Host, MsvcResolver, OsFamily, Platform, ToolchainError, VisualStudioVersion,
    XcodeResolver,
};

/// Flags that put the front end into MSVC compatibility.
const MSVC_COMPAT_ARGS: [&str; 3] = [
    "-fms-extensions",
    "-fms-compatibility",
    "-fdelayed-template-parsing",
];

/// Option state for one parse configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ParserOptions {
    /// C++ ABI to assume for layout and mangling
    pub abi: CppAbi,
    /// MSVC-compatible parsing semantics
    pub microsoft_mode: bool,
    /// Keep RTTI enabled (otherwise `-fno-rtti` is passed)
    pub enable_rtti: bool,
    /// Language and standard revision
    pub language_version: LanguageVersion,
    /// Encoded compiler version for version-specific builtins (0 = unset)
    pub tool_set_to_use: u32,
    /// Do not add the front end's own builtin header directory
    pub no_builtin_includes: bool,
    /// Do not search the front end's default system directories
    pub no_standard_includes: bool,
    /// Target triple (e.g., "x86_64-pc-windows-msvc")
    pub target_triple: Option<String>,
    /// Ask the front end for verbose output
    pub verbose: bool,
    arguments: Vec<String>,
    system_include_dirs: Vec<PathBuf>,
    include_dirs: Vec<PathBuf>,
    defines: Vec<String>,
    undefines: Vec<String>,
    current_dir: PathBuf,
}

impl ParserOptions {
    /// Create options with defaults for the given host platform.
    pub fn new(platform: &dyn Platform) -> Self {
        let abi = if platform.is_windows() {
            CppAbi::Microsoft
        } else {
            CppAbi::Itanium
        };

        ParserOptions {
            abi,
            microsoft_mode: !platform.is_unix(),
            enable_rtti: false,
            language_version: LanguageVersion::default(),
            tool_set_to_use: 0,
            no_builtin_includes: false,
            no_standard_includes: false,
            target_triple: None,
            verbose: false,
            arguments: Vec::new(),
            system_include_dirs: Vec::new(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            undefines: Vec::new(),
            current_dir: std::env::current_exe().unwrap_or_default(),
        }
    }

    /// Itanium or another non-Microsoft ABI.
    pub fn is_itanium_like_abi(&self) -> bool {
        self.abi != CppAbi::Microsoft
    }

    pub fn is_microsoft_abi(&self) -> bool {
        self.abi == CppAbi::Microsoft
    }

    /// Location of the invoking executable.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Append a front-end argument.
    pub fn add_argument(&mut self, arg: impl Into<String>) {
        self.arguments.push(arg.into());
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Append a system include directory (searched after earlier entries).
    pub fn add_system_include_dir(&mut self, dir: impl Into<PathBuf>) {
        self.system_include_dirs.push(dir.into());
    }

    pub fn system_include_dirs(&self) -> &[PathBuf] {
        &self.system_include_dirs
    }

    /// Append a user include directory (`-I`).
    pub fn add_include_dir(&mut self, dir: impl Into<PathBuf>) {
        self.include_dirs.push(dir.into());
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// Append a macro definition, `NAME` or `NAME=VALUE`.
    pub fn add_define(&mut self, define: impl Into<String>) {
        self.defines.push(define.into());
    }

    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Append a macro to undefine.
    pub fn add_undefine(&mut self, name: impl Into<String>) {
        self.undefines.push(name.into());
    }

    pub fn undefines(&self) -> &[String] {
        &self.undefines
    }

    /// Configure for MSVC using a Visual Studio version token.
    ///
    /// `choice` is the build-time selection ("vs2012" .. "vs2017"); anything
    /// else, including `None`, selects the latest known version.
    pub fn setup_msvc_with_choice(&mut self, choice: Option<&str>, resolver: &dyn MsvcResolver) {
        let vs_version = VisualStudioVersion::from_token(choice);
        if choice.is_some() && vs_version == VisualStudioVersion::Latest {
            tracing::debug!(
                "Unknown Visual Studio version {:?}, using latest",
                choice
            );
        }
        self.setup_msvc(vs_version, resolver);
    }

    /// Configure the options to parse code as the given MSVC would.
    ///
    /// Always switches to the Microsoft ABI, even on a non-Windows host.
    pub fn setup_msvc(&mut self, vs_version: VisualStudioVersion, resolver: &dyn MsvcResolver) {
        self.microsoft_mode = true;
        self.no_builtin_includes = true;
        self.no_standard_includes = true;
        self.abi = CppAbi::Microsoft;

        let cl_version = resolver.cl_version(vs_version);
        self.tool_set_to_use = cl_version.tool_set_id().unwrap_or_else(|| {
            tracing::warn!("cl {} has no tool-set encoding, leaving it unset", cl_version);
            0
        });

        for arg in MSVC_COMPAT_ARGS {
            self.add_argument(arg);
        }

        let includes = resolver.system_includes(vs_version);
        tracing::info!(
            "Configured MSVC {} (cl {}) with {} system include directories",
            vs_version,
            cl_version,
            includes.len()
        );
        for include in includes {
            self.add_system_include_dir(include);
        }
    }

    /// Configure the options to use the installed Xcode headers.
    ///
    /// Builtin headers come first, then libc++, then the SDK. If any folder
    /// cannot be found the options are left unchanged.
    pub fn setup_xcode(&mut self, resolver: &dyn XcodeResolver) -> Result<(), ToolchainError> {
        let builtins = resolver.builtin_includes_folder()?;
        let cpp = resolver.cpp_includes_folder()?;
        let sdk = resolver.sdk_includes_folder()?;

        tracing::debug!("Xcode builtin includes: {}", builtins.display());
        tracing::debug!("Xcode C++ includes: {}", cpp.display());
        tracing::debug!("Xcode SDK includes: {}", sdk.display());

        self.add_system_include_dir(builtins);
        self.add_system_include_dir(cpp);
        self.add_system_include_dir(sdk);

        self.no_builtin_includes = true;
        self.no_standard_includes = true;

        self.add_argument("-stdlib=libc++");
        Ok(())
    }

    /// Derive language arguments, then platform system includes.
    pub fn setup(&mut self, host: &Host) -> Result<(), ToolchainError> {
        self.setup_arguments();
        self.setup_includes(host)
    }

    fn setup_arguments(&mut self) {
        self.add_argument(self.language_version.language_flag());
        self.add_argument(self.language_version.std_flag(self.microsoft_mode));

        if !self.enable_rtti {
            self.add_argument("-fno-rtti");
        }
    }

    fn setup_includes(&mut self, host: &Host) -> Result<(), ToolchainError> {
        let platform = host.platform();
        if platform.is_macos() {
            self.setup_xcode(host.xcode())?;
        } else if platform.is_windows() && !self.no_builtin_includes {
            self.setup_msvc_with_choice(host.vs_choice(), host.msvc());
        }
        Ok(())
    }

    /// Render the full argument list for a clang-style front end.
    pub fn command_line(&self) -> Vec<String> {
        let mut argv = self.arguments.clone();

        if let Some(triple) = &self.target_triple {
            argv.push("-target".to_string());
            argv.push(triple.clone());
        }

        if self.microsoft_mode {
            if let Some(cl) = ClVersion::from_tool_set_id(self.tool_set_to_use) {
                argv.push(format!("-fms-compatibility-version={}", cl));
            }
        }

        if self.no_builtin_includes {
            argv.push("-nobuiltininc".to_string());
        }
        if self.no_standard_includes {
            argv.push("-nostdinc".to_string());
        }

        argv.extend(self.defines.iter().map(|d| format!("-D{}", d)));
        argv.extend(self.undefines.iter().map(|u| format!("-U{}", u)));
        argv.extend(self.include_dirs.iter().map(|i| format!("-I{}", i.display())));

        for dir in &self.system_include_dirs {
            argv.push("-isystem".to_string());
            argv.push(dir.display().to_string());
        }

        if self.verbose {
            argv.push("-v".to_string());
        }

        argv
    }
}

impl Default for ParserOptions {
    /// Defaults for the platform this binary was built for.
    fn default() -> Self {
        ParserOptions::new(&OsFamily::host())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_host, MockMsvcResolver, MockXcodeResolver};

    fn count(opts: &ParserOptions, arg: &str) -> usize {
        opts.arguments().iter().filter(|a| *a == arg).count()
    }

    #[test]
    fn test_unix_defaults() {
        for family in [OsFamily::Unix, OsFamily::MacOs] {
            let opts = ParserOptions::new(&family);
            assert_eq!(opts.abi, CppAbi::Itanium);
            assert!(opts.is_itanium_like_abi());
            assert!(!opts.is_microsoft_abi());
            assert!(!opts.microsoft_mode);
        }
    }

    #[test]
    fn test_windows_defaults() {
        let opts = ParserOptions::new(&OsFamily::Windows);
        assert_eq!(opts.abi, CppAbi::Microsoft);
        assert!(opts.is_microsoft_abi());
        assert!(!opts.is_itanium_like_abi());
        assert!(opts.microsoft_mode);
    }

    #[test]
    fn test_common_defaults() {
        let opts = ParserOptions::new(&OsFamily::Unix);
        assert!(!opts.enable_rtti);
        assert_eq!(opts.language_version, LanguageVersion::GnuPlusPlus11);
        assert_eq!(opts.tool_set_to_use, 0);
        assert!(!opts.no_builtin_includes);
        assert!(!opts.no_standard_includes);
        assert!(opts.arguments().is_empty());
        assert!(opts.system_include_dirs().is_empty());
        assert_eq!(
            opts.current_dir(),
            std::env::current_exe().unwrap().as_path()
        );
    }

    #[test]
    fn test_setup_standard_flags() {
        for version in LanguageVersion::ALL {
            for microsoft_mode in [false, true] {
                let host = mock_host(OsFamily::Unix);
                let mut opts = ParserOptions::new(&OsFamily::Unix);
                opts.language_version = version;
                opts.microsoft_mode = microsoft_mode;
                opts.setup(&host).unwrap();

                assert_eq!(opts.arguments()[0], version.language_flag());
                assert_eq!(opts.arguments()[1], version.std_flag(microsoft_mode));
            }
        }
    }

    #[test]
    fn test_cxx11_upgraded_under_microsoft_mode() {
        let host = mock_host(OsFamily::Unix);

        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.language_version = LanguageVersion::CPlusPlus11;
        opts.microsoft_mode = true;
        opts.setup(&host).unwrap();
        assert_eq!(count(&opts, "-std=c++14"), 1);

        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.language_version = LanguageVersion::CPlusPlus11;
        opts.setup(&host).unwrap();
        assert_eq!(count(&opts, "-std=c++11"), 1);
    }

    #[test]
    fn test_rtti_flag() {
        let host = mock_host(OsFamily::Unix);

        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.setup(&host).unwrap();
        assert_eq!(count(&opts, "-fno-rtti"), 1);

        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.enable_rtti = true;
        opts.setup(&host).unwrap();
        assert_eq!(count(&opts, "-fno-rtti"), 0);
    }

    #[test]
    fn test_setup_on_unix_adds_no_includes() {
        let host = mock_host(OsFamily::Unix);
        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.setup(&host).unwrap();

        assert_eq!(opts.arguments(), ["-xc++", "-std=gnu++11", "-fno-rtti"]);
        assert!(opts.system_include_dirs().is_empty());
        assert!(!opts.no_builtin_includes);
        assert_eq!(opts.tool_set_to_use, 0);
    }

    #[test]
    fn test_setup_msvc_vs2015() {
        let resolver = MockMsvcResolver::new();
        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.setup_msvc_with_choice(Some("vs2015"), &resolver);

        assert_eq!(opts.abi, CppAbi::Microsoft);
        assert!(opts.microsoft_mode);
        assert!(opts.no_builtin_includes);
        assert!(opts.no_standard_includes);
        assert_eq!(opts.tool_set_to_use, 190_000_000);
        assert_eq!(opts.arguments(), MSVC_COMPAT_ARGS);
        assert_eq!(
            opts.system_include_dirs(),
            resolver.system_includes(VisualStudioVersion::Vs2015)
        );
        assert_eq!(opts.system_include_dirs()[0], PathBuf::from("C:/vs2015/ucrt"));
    }

    #[test]
    fn test_setup_msvc_unencodable_cl_version() {
        let resolver = MockMsvcResolver::with_cl_version(ClVersion::new(19, 100));
        let mut opts = ParserOptions::new(&OsFamily::Windows);
        opts.setup_msvc(VisualStudioVersion::Latest, &resolver);

        assert!(opts.microsoft_mode);
        assert_eq!(opts.tool_set_to_use, 0);
        assert!(!opts
            .command_line()
            .iter()
            .any(|arg| arg.starts_with("-fms-compatibility-version")));

        let resolver = MockMsvcResolver::with_cl_version(ClVersion::new(500, 0));
        let mut opts = ParserOptions::new(&OsFamily::Windows);
        opts.setup_msvc(VisualStudioVersion::Latest, &resolver);
        assert_eq!(opts.tool_set_to_use, 0);
    }

    #[test]
    fn test_setup_msvc_unknown_token_matches_latest() {
        let resolver = MockMsvcResolver::new();

        let mut unknown = ParserOptions::new(&OsFamily::Windows);
        unknown.setup_msvc_with_choice(Some("vs1999"), &resolver);

        let mut none = ParserOptions::new(&OsFamily::Windows);
        none.setup_msvc_with_choice(None, &resolver);

        assert_eq!(unknown.tool_set_to_use, none.tool_set_to_use);
        assert_eq!(unknown.tool_set_to_use, 191_000_000);
        assert_eq!(unknown.arguments(), none.arguments());
        assert_eq!(unknown.system_include_dirs(), none.system_include_dirs());
    }

    #[test]
    fn test_setup_msvc_twice_duplicates() {
        let resolver = MockMsvcResolver::new();
        let mut opts = ParserOptions::new(&OsFamily::Windows);
        opts.setup_msvc(VisualStudioVersion::Vs2017, &resolver);
        opts.setup_msvc(VisualStudioVersion::Vs2017, &resolver);

        let per_call = resolver.system_includes(VisualStudioVersion::Vs2017);
        assert_eq!(opts.arguments().len(), 6);
        assert_eq!(count(&opts, "-fms-extensions"), 2);
        assert_eq!(opts.system_include_dirs().len(), per_call.len() * 2);
        assert_eq!(&opts.system_include_dirs()[per_call.len()..], per_call);
    }

    #[test]
    fn test_setup_msvc_keeps_resolver_order() {
        let resolver = MockMsvcResolver::with_includes(vec![
            PathBuf::from("z:/ucrt"),
            PathBuf::from("a:/um"),
            PathBuf::from("m:/msvc"),
        ]);
        let mut opts = ParserOptions::new(&OsFamily::Windows);
        opts.setup_msvc(VisualStudioVersion::Latest, &resolver);

        assert_eq!(
            opts.system_include_dirs(),
            [
                PathBuf::from("z:/ucrt"),
                PathBuf::from("a:/um"),
                PathBuf::from("m:/msvc"),
            ]
        );
    }

    #[test]
    fn test_setup_xcode_order() {
        let resolver = MockXcodeResolver::new();
        let mut opts = ParserOptions::new(&OsFamily::MacOs);
        opts.setup_xcode(&resolver).unwrap();

        assert_eq!(
            opts.system_include_dirs(),
            [
                PathBuf::from(MockXcodeResolver::BUILTIN),
                PathBuf::from(MockXcodeResolver::CPP),
                PathBuf::from(MockXcodeResolver::SDK),
            ]
        );
        assert!(opts.no_builtin_includes);
        assert!(opts.no_standard_includes);
        assert_eq!(opts.arguments(), ["-stdlib=libc++"]);
        assert_eq!(opts.abi, CppAbi::Itanium);
    }

    #[test]
    fn test_setup_xcode_failure_leaves_options_untouched() {
        let resolver = MockXcodeResolver::missing("C++ includes");
        let mut opts = ParserOptions::new(&OsFamily::MacOs);

        let err = opts.setup_xcode(&resolver).unwrap_err();
        assert!(matches!(err, ToolchainError::FolderNotFound { .. }));
        assert!(opts.system_include_dirs().is_empty());
        assert!(opts.arguments().is_empty());
        assert!(!opts.no_builtin_includes);
    }

    #[test]
    fn test_setup_on_macos_runs_xcode() {
        let host = mock_host(OsFamily::MacOs);
        let mut opts = ParserOptions::new(host.platform());
        opts.setup(&host).unwrap();

        assert_eq!(
            opts.arguments(),
            ["-xc++", "-std=gnu++11", "-fno-rtti", "-stdlib=libc++"]
        );
        assert_eq!(opts.system_include_dirs().len(), 3);
    }

    #[test]
    fn test_setup_on_macos_surfaces_xcode_errors() {
        let host = crate::toolchain::Host::new(
            OsFamily::MacOs,
            MockMsvcResolver::new(),
            MockXcodeResolver::missing("SDK includes"),
        );
        let mut opts = ParserOptions::new(host.platform());

        assert!(opts.setup(&host).is_err());
    }

    #[test]
    fn test_setup_on_windows_runs_msvc() {
        let host = mock_host(OsFamily::Windows);
        let mut opts = ParserOptions::new(host.platform());
        opts.setup(&host).unwrap();

        assert_eq!(opts.tool_set_to_use, 191_000_000);
        assert!(!opts.system_include_dirs().is_empty());
        assert_eq!(
            opts.arguments(),
            [
                "-xc++",
                "-std=gnu++14",
                "-fno-rtti",
                "-fms-extensions",
                "-fms-compatibility",
                "-fdelayed-template-parsing",
            ]
        );
    }

    #[test]
    fn test_setup_on_windows_uses_vs_choice() {
        let host = mock_host(OsFamily::Windows).with_vs_choice(Some("vs2013".to_string()));
        let mut opts = ParserOptions::new(host.platform());
        opts.setup(&host).unwrap();

        assert_eq!(opts.tool_set_to_use, 180_000_000);
    }

    #[test]
    fn test_setup_on_windows_after_explicit_msvc_does_not_rerun() {
        let host = mock_host(OsFamily::Windows);
        let mut opts = ParserOptions::new(host.platform());
        opts.setup_msvc(VisualStudioVersion::Vs2015, host.msvc());
        let includes_before = opts.system_include_dirs().to_vec();

        opts.setup(&host).unwrap();

        assert_eq!(opts.tool_set_to_use, 190_000_000);
        assert_eq!(count(&opts, "-fms-extensions"), 1);
        assert_eq!(opts.system_include_dirs(), includes_before);
    }

    #[test]
    fn test_setup_on_windows_with_suppressed_builtins() {
        let host = mock_host(OsFamily::Windows);
        let mut opts = ParserOptions::new(host.platform());
        opts.no_builtin_includes = true;
        opts.setup(&host).unwrap();

        assert_eq!(opts.tool_set_to_use, 0);
        assert!(opts.system_include_dirs().is_empty());
        assert_eq!(count(&opts, "-fms-extensions"), 0);
    }

    #[test]
    fn test_cross_target_msvc_from_unix() {
        let resolver = MockMsvcResolver::new();
        let mut opts = ParserOptions::new(&OsFamily::Unix);
        assert!(opts.is_itanium_like_abi());

        opts.setup_msvc(VisualStudioVersion::Vs2017, &resolver);
        assert!(opts.is_microsoft_abi());
        assert!(opts.microsoft_mode);
    }

    #[test]
    fn test_abi_and_mode_can_disagree() {
        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.microsoft_mode = true;

        assert_eq!(opts.abi, CppAbi::Itanium);
        assert!(opts.is_itanium_like_abi());
        assert!(opts.microsoft_mode);
    }

    #[test]
    fn test_command_line_order() {
        let resolver = MockMsvcResolver::with_includes(vec![
            PathBuf::from("C:/ucrt"),
            PathBuf::from("C:/msvc"),
        ]);
        let mut opts = ParserOptions::new(&OsFamily::Windows);
        opts.target_triple = Some("x86_64-pc-windows-msvc".to_string());
        opts.verbose = true;
        opts.add_define("FOO=1");
        opts.add_undefine("BAR");
        opts.add_include_dir("include");
        opts.setup_msvc(VisualStudioVersion::Vs2017, &resolver);

        assert_eq!(
            opts.command_line(),
            [
                "-fms-extensions",
                "-fms-compatibility",
                "-fdelayed-template-parsing",
                "-target",
                "x86_64-pc-windows-msvc",
                "-fms-compatibility-version=19.10",
                "-nobuiltininc",
                "-nostdinc",
                "-DFOO=1",
                "-UBAR",
                "-Iinclude",
                "-isystem",
                "C:/ucrt",
                "-isystem",
                "C:/msvc",
                "-v",
            ]
        );
    }

    #[test]
    fn test_command_line_defaults_are_minimal() {
        let opts = ParserOptions::new(&OsFamily::Unix);
        assert!(opts.command_line().is_empty());
    }

    #[test]
    fn test_serialize_to_json() {
        let mut opts = ParserOptions::new(&OsFamily::Unix);
        opts.add_argument("-xc");
        let json = serde_json::to_value(&opts).unwrap();

        assert_eq!(json["abi"], "itanium");
        assert_eq!(json["language_version"], "gnu++11");
        assert_eq!(json["arguments"][0], "-xc");
    }
}
