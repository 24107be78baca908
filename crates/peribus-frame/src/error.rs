/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload is too large for the u32 length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The frame does not carry the expected delimiter byte.
    #[error("invalid frame delimiter {found:#04x} (expected 0x3a)")]
    InvalidDelimiter { found: u8 },

    /// The command byte is not part of the bridge command set.
    #[error("unknown command byte {0:#04x}")]
    InvalidCommand(u8),

    /// The length field is below the protocol minimum.
    #[error("invalid length field {0} (minimum 3)")]
    InvalidLength(u32),

    /// Too many bytes to parse as a big-endian integer.
    #[error("integer field too wide ({len} bytes, max 8)")]
    IntegerTooWide { len: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
