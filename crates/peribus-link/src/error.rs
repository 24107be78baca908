/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] peribus_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] peribus_frame::FrameError),

    /// The bridge did not acknowledge the connection probe.
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    /// The link is not connected.
    #[error("not connected")]
    NotConnected,

    /// The bridge closed the connection.
    #[error("bridge disconnected: {0}")]
    Disconnected(String),

    /// The SPI target never cleared its busy flag within the probe budget.
    #[error("spi target still busy after {polls} status probes")]
    BusyTimeout { polls: u8 },

    /// The bridge returned a response the protocol cannot interpret.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, LinkError>;
