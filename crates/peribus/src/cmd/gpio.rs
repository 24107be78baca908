use clap::{Args, Subcommand};

use crate::cmd::ConnectArgs;
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_bytes, print_status, OutputFormat};

#[derive(Args, Debug)]
pub struct GpioArgs {
    #[command(subcommand)]
    pub action: GpioAction,
}

#[derive(Subcommand, Debug)]
pub enum GpioAction {
    /// Drive a pin to a level.
    Write {
        /// Pin number.
        pin: u8,
        /// Level byte to drive (0 or 1).
        value: u8,
    },
    /// Sample a pin.
    Read {
        /// Pin number.
        pin: u8,
    },
}

pub fn run(args: GpioArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut link = connect.open()?;

    match args.action {
        GpioAction::Write { pin, value } => {
            link.gpio_write(pin, &[value])
                .map_err(|err| link_error("gpio write failed", err))?;
            print_status(&format!("pin {pin} set to {value}"), format);
        }
        GpioAction::Read { pin } => {
            let reply = link
                .gpio_read(pin)
                .map_err(|err| link_error("gpio read failed", err))?;
            print_bytes("gpio-read", pin, &reply, format);
        }
    }

    link.disconnect();
    Ok(SUCCESS)
}
