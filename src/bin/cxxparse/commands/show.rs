//! `cxxparse show` command

use anyhow::{Context, Result};

use cxxparse::toolchain::ClVersion;
use cxxparse::ParserOptions;

use crate::cli::ShowArgs;

pub fn execute(args: ShowArgs) -> Result<()> {
    let opts = super::build_options(&args.setup)?;

    if args.json {
        let json = serde_json::to_string_pretty(&opts)
            .context("failed to serialize parser options")?;
        println!("{}", json);
        return Ok(());
    }

    print_options(&opts);
    Ok(())
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn print_options(opts: &ParserOptions) {
    println!("Parser options:");
    println!();
    println!("  ABI:            {}", opts.abi);
    println!("  Microsoft mode: {}", enabled(opts.microsoft_mode));
    println!("  Language:       {}", opts.language_version);
    println!("  RTTI:           {}", enabled(opts.enable_rtti));
    match ClVersion::from_tool_set_id(opts.tool_set_to_use) {
        Some(cl) => println!("  Tool set:       {} (cl {})", opts.tool_set_to_use, cl),
        None => println!("  Tool set:       none"),
    }
    println!("  No builtins:    {}", enabled(opts.no_builtin_includes));
    println!("  No std incs:    {}", enabled(opts.no_standard_includes));
    if let Some(ref triple) = opts.target_triple {
        println!("  Target:         {}", triple);
    }
    println!("  Current dir:    {}", opts.current_dir().display());

    println!();
    println!("Arguments:");
    for arg in opts.arguments() {
        println!("  {}", arg);
    }

    println!();
    println!("System include directories:");
    if opts.system_include_dirs().is_empty() {
        println!("  (front-end defaults)");
    }
    for dir in opts.system_include_dirs() {
        println!("  {}", dir.display());
    }
}
