//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cxxparse::LanguageVersion;

/// cxxparse - compute front-end arguments for parsing C/C++
#[derive(Parser)]
#[command(name = "cxxparse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the front-end command line, one argument per line
    Args(SetupArgs),

    /// Show the computed parser options
    Show(ShowArgs),
}

#[derive(Args)]
pub struct SetupArgs {
    /// Language version (c, gnu-c, c++98, gnu++98, c++11, gnu++11)
    #[arg(long = "lang", value_name = "VERSION")]
    pub language: Option<LanguageVersion>,

    /// Keep RTTI enabled
    #[arg(long)]
    pub rtti: bool,

    /// Configure for MSVC with a Visual Studio version (vs2012..vs2017, latest)
    #[arg(long, value_name = "VERSION")]
    pub msvc: Option<String>,

    /// Configure for the Xcode headers, even on a non-Apple host
    #[arg(long)]
    pub xcode: bool,

    /// Xcode developer directory (defaults to `xcode-select -p`)
    #[arg(long, value_name = "DIR", env = "DEVELOPER_DIR")]
    pub developer_dir: Option<PathBuf>,

    /// Target triple passed to the front end
    #[arg(long)]
    pub target: Option<String>,

    /// Define a macro (NAME or NAME=VALUE)
    #[arg(short = 'D', value_name = "MACRO")]
    pub define: Vec<String>,

    /// Undefine a macro
    #[arg(short = 'U', value_name = "MACRO")]
    pub undefine: Vec<String>,

    /// Add a user include directory
    #[arg(short = 'I', value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Project directory to read `.cxxparse/config.toml` from
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Print the options as JSON
    #[arg(long)]
    pub json: bool,
}
