//! cxxparse - front-end invocation setup for C/C++ AST parsing
//!
//! This crate computes the arguments, system include directories and ABI
//! settings a clang-style front end needs to parse C and C++ the way the
//! host's toolchain (MSVC, Xcode, or a Unix compiler) would.

pub mod core;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for cxxparse unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides mock MSVC and Xcode resolvers.
#[cfg(test)]
pub mod test_support;

pub use core::{abi::CppAbi, language::LanguageVersion, options::ParserOptions};

pub use toolchain::{
    Host, HostMsvcResolver, HostXcodeResolver, MsvcResolver, OsFamily, Platform, ToolchainError,
    VisualStudioVersion, XcodeResolver,
};
pub use util::config::Config;
