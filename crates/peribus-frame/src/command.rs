//! The bridge command set.
//!
//! Fixed, closed set of operations the firmware understands. The wire values
//! must match the firmware exactly; DEBUG sits apart at 0x0F.

use crate::error::FrameError;

/// A peripheral operation, one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Connection handshake / liveness probe.
    Connecting = 0x00,
    /// Configure the I2C clock.
    I2cConf = 0x01,
    /// Write bytes to an I2C target.
    I2cWrite = 0x02,
    /// Read bytes from an I2C target.
    I2cRead = 0x03,
    /// Configure SPI mode and clock.
    SpiConf = 0x04,
    /// Full-duplex SPI transfer.
    SpiReadWrite = 0x05,
    /// Drive a GPIO pin.
    GpioWrite = 0x06,
    /// Sample a GPIO pin.
    GpioRead = 0x07,
    /// Sample an ADC channel.
    AdcRead = 0x08,
    /// Toggle firmware debug output.
    Debug = 0x0F,
}

impl Command {
    /// The byte this command encodes to.
    pub fn wire_value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Command::Connecting),
            0x01 => Ok(Command::I2cConf),
            0x02 => Ok(Command::I2cWrite),
            0x03 => Ok(Command::I2cRead),
            0x04 => Ok(Command::SpiConf),
            0x05 => Ok(Command::SpiReadWrite),
            0x06 => Ok(Command::GpioWrite),
            0x07 => Ok(Command::GpioRead),
            0x08 => Ok(Command::AdcRead),
            0x0F => Ok(Command::Debug),
            other => Err(FrameError::InvalidCommand(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_match_firmware() {
        assert_eq!(Command::Connecting.wire_value(), 0x00);
        assert_eq!(Command::I2cConf.wire_value(), 0x01);
        assert_eq!(Command::I2cWrite.wire_value(), 0x02);
        assert_eq!(Command::I2cRead.wire_value(), 0x03);
        assert_eq!(Command::SpiConf.wire_value(), 0x04);
        assert_eq!(Command::SpiReadWrite.wire_value(), 0x05);
        assert_eq!(Command::GpioWrite.wire_value(), 0x06);
        assert_eq!(Command::GpioRead.wire_value(), 0x07);
        assert_eq!(Command::AdcRead.wire_value(), 0x08);
        assert_eq!(Command::Debug.wire_value(), 0x0F);
    }

    #[test]
    fn byte_roundtrip() {
        for cmd in [
            Command::Connecting,
            Command::I2cConf,
            Command::I2cWrite,
            Command::I2cRead,
            Command::SpiConf,
            Command::SpiReadWrite,
            Command::GpioWrite,
            Command::GpioRead,
            Command::AdcRead,
            Command::Debug,
        ] {
            assert_eq!(Command::try_from(cmd.wire_value()).unwrap(), cmd);
        }
    }

    #[test]
    fn unknown_bytes_rejected() {
        for byte in [0x09u8, 0x0E, 0x10, 0xFF] {
            assert!(matches!(
                Command::try_from(byte),
                Err(FrameError::InvalidCommand(b)) if b == byte
            ));
        }
    }
}
