//! SPI sub-protocol constants.
//!
//! These are payload bytes addressed to the downstream SPI target (an EEPROM
//! style register set); the framing layer treats them as opaque.

/// Opcodes understood by the SPI target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SpiOpcode {
    /// Write status register.
    Wrsr = 1,
    /// Write data.
    Write = 2,
    /// Read data.
    Read = 3,
    /// Write disable.
    Wrdi = 4,
    /// Read status register.
    Rdsr = 5,
    /// Write enable.
    Wren = 6,
}

impl SpiOpcode {
    /// The payload byte for this opcode.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Maximum number of status probes before a busy target is given up on.
pub const MAX_BUSY_POLLS: u8 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_bytes_are_sequential() {
        assert_eq!(SpiOpcode::Wrsr.as_byte(), 1);
        assert_eq!(SpiOpcode::Write.as_byte(), 2);
        assert_eq!(SpiOpcode::Read.as_byte(), 3);
        assert_eq!(SpiOpcode::Wrdi.as_byte(), 4);
        assert_eq!(SpiOpcode::Rdsr.as_byte(), 5);
        assert_eq!(SpiOpcode::Wren.as_byte(), 6);
    }
}
