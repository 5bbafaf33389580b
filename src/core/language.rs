//! Language versions accepted by the front end.
//!
//! Each [`LanguageVersion`] maps to a `-x` language selection flag and a
//! `-std=` flag. Under Microsoft compatibility mode the C++11 family is
//! parsed as C++14, which MSVC headers require.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source language and standard revision to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LanguageVersion {
    /// The C programming language
    #[serde(rename = "c", alias = "c99")]
    C,
    /// The C programming language (GNU version)
    #[serde(rename = "gnu-c", alias = "gnu99", alias = "gnuc")]
    GnuC,
    /// C++ 1998; supports deprecated constructs
    #[serde(rename = "c++98", alias = "cpp98")]
    CPlusPlus98,
    /// C++ 1998; supports deprecated constructs (GNU version)
    #[serde(rename = "gnu++98")]
    GnuPlusPlus98,
    /// C++ 2011
    #[serde(rename = "c++11", alias = "cpp11")]
    CPlusPlus11,
    /// C++ 2011 (GNU version)
    #[default]
    #[serde(rename = "gnu++11")]
    GnuPlusPlus11,
}

impl LanguageVersion {
    /// All supported language versions.
    pub const ALL: [LanguageVersion; 6] = [
        LanguageVersion::C,
        LanguageVersion::GnuC,
        LanguageVersion::CPlusPlus98,
        LanguageVersion::GnuPlusPlus98,
        LanguageVersion::CPlusPlus11,
        LanguageVersion::GnuPlusPlus11,
    ];

    /// Get the canonical name (e.g., "gnu++11").
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageVersion::C => "c",
            LanguageVersion::GnuC => "gnu-c",
            LanguageVersion::CPlusPlus98 => "c++98",
            LanguageVersion::GnuPlusPlus98 => "gnu++98",
            LanguageVersion::CPlusPlus11 => "c++11",
            LanguageVersion::GnuPlusPlus11 => "gnu++11",
        }
    }

    /// Whether this is one of the C (not C++) versions.
    pub fn is_c(&self) -> bool {
        matches!(self, LanguageVersion::C | LanguageVersion::GnuC)
    }

    /// The `-x` flag selecting the front-end language.
    pub fn language_flag(&self) -> &'static str {
        if self.is_c() {
            "-xc"
        } else {
            "-xc++"
        }
    }

    /// The `-std=` flag for this version.
    pub fn std_flag(&self, microsoft_mode: bool) -> &'static str {
        match self {
            LanguageVersion::C => "-std=c99",
            LanguageVersion::GnuC => "-std=gnu99",
            LanguageVersion::CPlusPlus98 => "-std=c++98",
            LanguageVersion::GnuPlusPlus98 => "-std=gnu++98",
            LanguageVersion::CPlusPlus11 if microsoft_mode => "-std=c++14",
            LanguageVersion::CPlusPlus11 => "-std=c++11",
            LanguageVersion::GnuPlusPlus11 if microsoft_mode => "-std=gnu++14",
            LanguageVersion::GnuPlusPlus11 => "-std=gnu++11",
        }
    }
}

impl std::str::FromStr for LanguageVersion {
    type Err = LanguageVersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" | "c99" => Ok(LanguageVersion::C),
            "gnu-c" | "gnuc" | "gnu99" => Ok(LanguageVersion::GnuC),
            "c++98" | "cpp98" => Ok(LanguageVersion::CPlusPlus98),
            "gnu++98" => Ok(LanguageVersion::GnuPlusPlus98),
            "c++11" | "cpp11" => Ok(LanguageVersion::CPlusPlus11),
            "gnu++11" => Ok(LanguageVersion::GnuPlusPlus11),
            _ => Err(LanguageVersionParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid language version string.
#[derive(Debug, Clone, Error)]
#[error("invalid language version '{0}', valid values: c, gnu-c, c++98, gnu++98, c++11, gnu++11")]
pub struct LanguageVersionParseError(pub String);
