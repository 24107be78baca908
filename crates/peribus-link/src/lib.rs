//! Connection management and peripheral operations for the peribus bridge.
//!
//! [`DeviceLink`] owns one exclusively-held duplex stream to the bridge
//! firmware and drives the framed request/response protocol over it: the
//! `acknowledged` handshake, per-peripheral commands, and the bounded SPI
//! busy-poll. All operations are synchronous; callers needing concurrent
//! access must add their own serialization around the link.

pub mod error;
pub mod link;
pub mod spi;

pub use error::{LinkError, Result};
pub use link::{DeviceLink, LinkConfig, ACK_TEXT, DEBUG_ADDRESS, RECV_BUFFER_SIZE};
pub use spi::{SpiOpcode, MAX_BUSY_POLLS};
