//! Host platform classification.

use super::Platform;

/// Operating system family, as far as parser setup is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Linux, BSD and other non-Apple Unix-like systems
    Unix,
    /// macOS (Unix-like, Xcode toolchain)
    MacOs,
    /// Windows (MSVC toolchain)
    Windows,
}

impl OsFamily {
    /// The family this binary was built for.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    /// Get the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Unix => "unix",
            OsFamily::MacOs => "macos",
            OsFamily::Windows => "windows",
        }
    }
}

impl Platform for OsFamily {
    fn is_unix(&self) -> bool {
        matches!(self, OsFamily::Unix | OsFamily::MacOs)
    }

    fn is_macos(&self) -> bool {
        *self == OsFamily::MacOs
    }

    fn is_windows(&self) -> bool {
        *self == OsFamily::Windows
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
