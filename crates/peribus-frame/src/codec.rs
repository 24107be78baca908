use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::command::Command;
use crate::error::{FrameError, Result};

/// Frame header: length (4) + delimiter (1) + command (1) + address (1) = 7 bytes.
pub const HEADER_SIZE: usize = 7;

/// Delimiter byte the firmware scans for to detect frame start.
pub const DELIMITER: u8 = 0x3A;

/// Largest payload the u32 length field can describe (`3 + (len - 1)` must fit).
const MAX_PAYLOAD: usize = (u32::MAX - 2) as usize;

/// A decoded protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The peripheral operation.
    pub command: Command,
    /// Peripheral sub-address (0 if unused).
    pub address: u8,
    /// Payload bytes. Frames encoded without a payload decode to `[0x00]`.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(command: Command, address: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            address,
            payload: payload.into(),
        }
    }
}

/// Encode a command into the wire format.
///
/// Wire format (big-endian throughout):
/// ```text
/// ┌────────────┬────────────┬──────────┬──────────┬──────────────┐
/// │ Length     │ Delimiter  │ Command  │ Address  │ Payload       │
/// │ (4B BE)    │ 0x3A       │ (1B)     │ (1B)     │ (≥ 1 byte)    │
/// └────────────┴────────────┴──────────┴──────────┴──────────────┘
/// ```
///
/// The length field is a legacy convention the firmware relies on:
/// `3 + (payload_len - 1)` for a non-empty payload, `3` when the payload is
/// empty (in which case a single zero byte is sent in its place). It does NOT
/// equal the count of bytes following it; do not "correct" it.
pub fn encode_frame(command: Command, address: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    let length = if payload.is_empty() {
        3u32
    } else {
        3 + (payload.len() as u32 - 1)
    };

    dst.reserve(HEADER_SIZE + payload.len().max(1));
    dst.put_u32(length);
    dst.put_u8(DELIMITER);
    dst.put_u8(command.wire_value());
    dst.put_u8(address);
    if payload.is_empty() {
        dst.put_u8(0x00);
    } else {
        dst.put_slice(payload);
    }
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. This is the inverse
/// of [`encode_frame`] and is what the firmware side performs; the host uses
/// it for loopback verification and in tests standing in for the firmware.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let length = u32::from_be_bytes(src[0..4].try_into().expect("4-byte slice"));
    if length < 3 {
        return Err(FrameError::InvalidLength(length));
    }
    if src[4] != DELIMITER {
        return Err(FrameError::InvalidDelimiter { found: src[4] });
    }

    // Inverse of the legacy length formula: payload always occupies
    // `length - 2` bytes on the wire (the empty-payload case encodes as a
    // single zero byte, indistinguishable from a 1-byte payload).
    let payload_len = (length - 2) as usize;
    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    let command = Command::try_from(src[5])?;
    let address = src[6];

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Frame {
        command,
        address,
        payload,
    }))
}

/// Parse up to 8 bytes as a big-endian unsigned integer.
///
/// Peripheral responses are raw byte strings whose interpretation is
/// per-command; ADC samples and similar counters come back as variable-width
/// big-endian integers.
pub fn be_uint(bytes: &[u8]) -> Result<u64> {
    if bytes.len() > 8 {
        return Err(FrameError::IntegerTooWide { len: bytes.len() });
    }
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i2c_write_concrete_bytes() {
        let mut buf = BytesMut::new();
        encode_frame(Command::I2cWrite, 56, &[3, 207], &mut buf).unwrap();
        assert_eq!(
            buf.as_ref(),
            &[0x00, 0x00, 0x00, 0x04, 0x3A, 0x02, 0x38, 0x03, 0xCF]
        );
    }

    #[test]
    fn gpio_read_defaults_payload_to_zero_byte() {
        let mut buf = BytesMut::new();
        encode_frame(Command::GpioRead, 13, &[], &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x00, 0x00, 0x00, 0x03, 0x3A, 0x07, 0x0D, 0x00]);
    }

    #[test]
    fn length_formula_for_all_small_payloads() {
        for len in 1usize..=64 {
            let payload = vec![0xAAu8; len];
            let mut buf = BytesMut::new();
            encode_frame(Command::SpiReadWrite, 7, &payload, &mut buf).unwrap();

            let field = u32::from_be_bytes(buf[0..4].try_into().unwrap());
            assert_eq!(field as usize, 3 + (len - 1), "payload len {len}");
            assert_eq!(buf.len(), HEADER_SIZE + len);
        }
    }

    #[test]
    fn empty_payload_length_is_three() {
        let mut buf = BytesMut::new();
        encode_frame(Command::Connecting, 0, &[], &mut buf).unwrap();
        let field = u32::from_be_bytes(buf[0..4].try_into().unwrap());
        assert_eq!(field, 3);
        assert_eq!(buf.len(), HEADER_SIZE + 1);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        encode_frame(Command::I2cRead, 0x38, &[0, 0, 0, 1], &mut buf).unwrap();

        let frame = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(frame.command, Command::I2cRead);
        assert_eq!(frame.address, 0x38);
        assert_eq!(frame.payload.as_ref(), &[0, 0, 0, 1]);
        assert!(buf.is_empty());
    }

    #[test]
    fn roundtrip_empty_payload_decodes_as_zero_byte() {
        let mut buf = BytesMut::new();
        encode_frame(Command::Connecting, 0, &[], &mut buf).unwrap();

        let frame = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(frame.command, Command::Connecting);
        assert_eq!(frame.address, 0);
        assert_eq!(frame.payload.as_ref(), &[0x00]);
    }

    #[test]
    fn decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x00, 0x00, 0x00][..]);
        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(Command::I2cWrite, 1, &[1, 2, 3, 4], &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2);
        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_rejects_bad_delimiter() {
        let mut buf = BytesMut::from(&[0x00, 0x00, 0x00, 0x03, 0xFF, 0x00, 0x00, 0x00][..]);
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidDelimiter { found: 0xFF }));
    }

    #[test]
    fn decode_rejects_unknown_command() {
        let mut buf = BytesMut::from(&[0x00, 0x00, 0x00, 0x03, 0x3A, 0x0E, 0x00, 0x00][..]);
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidCommand(0x0E)));
    }

    #[test]
    fn decode_rejects_undersized_length() {
        let mut buf = BytesMut::from(&[0x00, 0x00, 0x00, 0x01, 0x3A, 0x00, 0x00, 0x00][..]);
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidLength(1)));
    }

    #[test]
    fn decode_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(Command::GpioWrite, 13, &[0x01], &mut buf).unwrap();
        encode_frame(Command::GpioRead, 13, &[], &mut buf).unwrap();

        let f1 = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(f1.command, Command::GpioWrite);
        assert_eq!(f1.payload.as_ref(), &[0x01]);

        let f2 = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(f2.command, Command::GpioRead);
        assert_eq!(f2.address, 13);

        assert!(buf.is_empty());
    }

    #[test]
    fn be_uint_parses_variable_widths() {
        assert_eq!(be_uint(&[]).unwrap(), 0);
        assert_eq!(be_uint(&[0x0F]).unwrap(), 15);
        assert_eq!(be_uint(&[0x0F, 0xFF]).unwrap(), 4095);
        assert_eq!(be_uint(&[0x00, 0x00, 0x00, 0x01]).unwrap(), 1);
        assert_eq!(be_uint(&[0xFF; 8]).unwrap(), u64::MAX);
    }

    #[test]
    fn be_uint_rejects_oversized_input() {
        let err = be_uint(&[0u8; 9]).unwrap_err();
        assert!(matches!(err, FrameError::IntegerTooWide { len: 9 }));
    }
}
