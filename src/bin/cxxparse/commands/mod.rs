//! Command implementations

pub mod args;
pub mod show;

use anyhow::{Context, Result};

use cxxparse::util::config::load_config_for;
use cxxparse::{Host, HostMsvcResolver, HostXcodeResolver, OsFamily, ParserOptions};

use crate::cli::SetupArgs;

/// Build and set up parser options from config files and CLI flags.
///
/// Config values are applied first; flags given on the command line win.
pub fn build_options(args: &SetupArgs) -> Result<ParserOptions> {
    let project_root = match &args.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let config = load_config_for(&project_root);

    let xcode = match &args.developer_dir {
        Some(dir) => HostXcodeResolver::with_developer_dir(dir),
        None => HostXcodeResolver::new(),
    };
    let host = Host::new(OsFamily::host(), HostMsvcResolver::new(), xcode)
        .with_vs_choice(config.msvc.version.clone());

    let mut opts = ParserOptions::new(host.platform());
    config.apply(&mut opts);

    if let Some(language) = args.language {
        opts.language_version = language;
    }
    if args.rtti {
        opts.enable_rtti = true;
    }
    if let Some(target) = &args.target {
        opts.target_triple = Some(target.clone());
    }
    for define in &args.define {
        opts.add_define(define.clone());
    }
    for name in &args.undefine {
        opts.add_undefine(name.clone());
    }
    for dir in &args.include {
        opts.add_include_dir(dir.clone());
    }

    if let Some(token) = &args.msvc {
        opts.setup_msvc_with_choice(Some(token.as_str()), host.msvc());
    }
    // macOS hosts already run the Xcode setup as part of `setup`.
    if args.xcode && !host.platform().is_macos() {
        opts.setup_xcode(host.xcode()).context("failed to set up Xcode headers")?;
    }

    opts.setup(&host).context("failed to set up parser options")?;

    Ok(opts)
}
