//! Wire framing for the peribus bridge protocol.
//!
//! Every command sent to the bridge firmware is framed with:
//! - A 4-byte big-endian length field (legacy formula, see [`codec`])
//! - A delimiter byte (0x3A) the firmware uses to detect frame start
//! - A 1-byte command and 1-byte peripheral address
//! - A payload, defaulting to a single zero byte when the caller has none
//!
//! This layer is pure translation; it performs no I/O.

pub mod codec;
pub mod command;
pub mod error;

pub use codec::{be_uint, decode_frame, encode_frame, Frame, DELIMITER, HEADER_SIZE};
pub use command::Command;
pub use error::{FrameError, Result};
