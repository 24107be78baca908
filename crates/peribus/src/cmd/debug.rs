use clap::Args;

use crate::cmd::{ConnectArgs, Toggle};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_status, OutputFormat};

#[derive(Args, Debug)]
pub struct DebugArgs {
    /// Desired debug state.
    pub state: Toggle,
}

pub fn run(args: DebugArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut link = connect.open()?;

    link.set_debug(args.state.enabled())
        .map_err(|err| link_error("debug toggle failed", err))?;

    let state = if args.state.enabled() { "on" } else { "off" };
    print_status(&format!("firmware debug {state}"), format);

    link.disconnect();
    Ok(SUCCESS)
}
