//! Core data structures for cxxparse.
//!
//! This module contains the option state handed to the native front end:
//! - ABI selection
//! - Language versions and their standard flags
//! - The parser option record and its setup routines

pub mod abi;
pub mod language;
pub mod options;

pub use abi::CppAbi;
pub use language::LanguageVersion;
pub use options::ParserOptions;
