use clap::{Args, Subcommand, ValueEnum};

use peribus_link::DeviceLink;
use peribus_transport::BridgeStream;

use crate::exit::{link_error, CliResult};
use crate::output::OutputFormat;

pub mod adc;
pub mod debug;
pub mod gpio;
pub mod i2c;
pub mod probe;
pub mod spi;

/// Bridge endpoint shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Bridge host name or IP address.
    #[arg(long, global = true, env = "PERIBUS_HOST", default_value = "192.168.200.69")]
    pub host: String,

    /// Bridge TCP port.
    #[arg(long, global = true, env = "PERIBUS_PORT", default_value_t = 4455)]
    pub port: u16,
}

impl ConnectArgs {
    /// Connect and handshake with the bridge.
    pub fn open(&self) -> CliResult<DeviceLink<BridgeStream>> {
        DeviceLink::connect(&self.host, self.port)
            .map_err(|err| link_error("failed to connect to bridge", err))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the bridge and verify the handshake.
    Probe(probe::ProbeArgs),
    /// Drive or sample a GPIO pin.
    Gpio(gpio::GpioArgs),
    /// Run the I2C exerciser sequence against a target device.
    I2cTest(i2c::I2cTestArgs),
    /// Run the SPI EEPROM exerciser sequence.
    SpiTest(spi::SpiTestArgs),
    /// Sample an ADC channel and report the averaged voltage.
    Adc(adc::AdcArgs),
    /// Toggle firmware debug output.
    Debug(debug::DebugArgs),
}

pub fn run(command: Command, connect: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Probe(args) => probe::run(args, connect, format),
        Command::Gpio(args) => gpio::run(args, connect, format),
        Command::I2cTest(args) => i2c::run(args, connect, format),
        Command::SpiTest(args) => spi::run(args, connect, format),
        Command::Adc(args) => adc::run(args, connect, format),
        Command::Debug(args) => debug::run(args, connect, format),
    }
}

/// On/off toggle used by `debug`.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}
