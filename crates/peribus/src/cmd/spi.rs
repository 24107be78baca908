use clap::Args;
use tracing::debug;

use peribus_link::SpiOpcode;

use crate::cmd::ConnectArgs;
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_bytes, OutputFormat};

#[derive(Args, Debug)]
pub struct SpiTestArgs {
    /// SPI chip-select address.
    #[arg(long, default_value_t = 7)]
    pub target: u8,

    /// Configure SPI mode before the sequence (0-3).
    #[arg(long)]
    pub mode: Option<u8>,

    /// Clock rate in Hz, used with --mode.
    #[arg(long, default_value_t = 1_000_000.0)]
    pub clock: f64,
}

/// Exercises an SPI EEPROM: write-enable, status readback, three one-byte
/// writes, then a readback of the written region. Each transfer runs through
/// the busy-poll, so a wedged target surfaces as a timeout rather than
/// garbage data.
pub fn run(args: SpiTestArgs, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut link = connect.open()?;

    if let Some(mode) = args.mode {
        link.spi_config(mode, args.clock)
            .map_err(|err| link_error("spi config failed", err))?;
        debug!(mode, clock = args.clock, "spi configured");
    }

    let wren = [SpiOpcode::Wren.as_byte()];
    let sequence: [&[u8]; 8] = [
        &wren,
        &[SpiOpcode::Rdsr.as_byte(), 0],
        &[SpiOpcode::Write.as_byte(), 0, 0, 7],
        &wren,
        &[SpiOpcode::Write.as_byte(), 0, 1, 8],
        &wren,
        &[SpiOpcode::Write.as_byte(), 0, 2, 9],
        &[SpiOpcode::Read.as_byte(), 0, 0, 0, 0, 0],
    ];

    let mut last_reply = Vec::new();
    for payload in sequence {
        last_reply = link
            .spi_transfer(args.target, payload)
            .map_err(|err| link_error("spi transfer failed", err))?;
        debug!(target = args.target, ?payload, reply_len = last_reply.len(), "spi transfer");
    }

    // The final transfer is the readback of the three written bytes.
    print_bytes("spi-read", args.target, &last_reply, format);

    link.disconnect();
    Ok(SUCCESS)
}
