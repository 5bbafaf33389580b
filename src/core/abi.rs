//! C++ ABI selection.
//!
//! The ABI decides how the front end lays out records and mangles names.
//! Downstream consumers should branch on [`CppAbi`] (or the predicates on
//! `ParserOptions`) rather than on Microsoft compatibility mode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// C++ ABI the parser should assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CppAbi {
    /// Itanium C++ ABI (GCC, Clang on Unix-like hosts)
    Itanium,
    /// Microsoft C++ ABI (MSVC)
    #[serde(alias = "msvc")]
    Microsoft,
}

impl CppAbi {
    /// Get the ABI name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CppAbi::Itanium => "itanium",
            CppAbi::Microsoft => "microsoft",
        }
    }
}

impl std::str::FromStr for CppAbi {
    type Err = AbiParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "itanium" => Ok(CppAbi::Itanium),
            "microsoft" | "msvc" => Ok(CppAbi::Microsoft),
            _ => Err(AbiParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for CppAbi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid ABI name.
#[derive(Debug, Clone, Error)]
#[error("invalid C++ ABI '{0}', valid values: itanium, microsoft")]
pub struct AbiParseError(pub String);
