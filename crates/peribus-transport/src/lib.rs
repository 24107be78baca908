//! TCP transport for the peribus peripheral bridge.
//!
//! The bridge firmware listens on a plain TCP socket; this crate provides the
//! duplex byte stream the protocol layers run over. Connects are bounded by a
//! timeout, and closing the stream from another handle fails in-flight reads
//! promptly (cancellation-by-close).

mod error;
mod stream;

pub use error::{Result, TransportError};
pub use stream::{BridgeStream, DEFAULT_CONNECT_TIMEOUT};
