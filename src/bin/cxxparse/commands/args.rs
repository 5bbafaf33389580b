//! `cxxparse args` command

use anyhow::Result;

use crate::cli::SetupArgs;

pub fn execute(args: SetupArgs) -> Result<()> {
    let opts = super::build_options(&args)?;

    for arg in opts.command_line() {
        println!("{}", arg);
    }

    Ok(())
}
