use clap::Args;
use tracing::debug;

use crate::cmd::ConnectArgs;
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_bytes, OutputFormat};

#[derive(Args, Debug)]
pub struct I2cTestArgs {
    /// I2C target address.
    #[arg(long, default_value_t = 56)]
    pub target: u8,

    /// Configure the bus clock (Hz) before the sequence.
    #[arg(long)]
    pub clock: Option<u32>,
}

/// Exercises an I2C GPIO expander: three register writes, then a one-byte
/// readback.
pub fn run(args: I2cTestArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut link = connect.open()?;

    if let Some(clock) = args.clock {
        link.i2c_config(clock)
            .map_err(|err| link_error("i2c config failed", err))?;
        debug!(clock, "i2c clock configured");
    }

    for payload in [[3u8, 207], [2, 224], [1, 207]] {
        link.i2c_write(args.target, &payload)
            .map_err(|err| link_error("i2c write failed", err))?;
        debug!(target = args.target, ?payload, "i2c write");
    }

    let reply = link
        .i2c_read(args.target, 1)
        .map_err(|err| link_error("i2c read failed", err))?;
    print_bytes("i2c-read", args.target, &reply, format);

    link.disconnect();
    Ok(SUCCESS)
}
