use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

/// Default bound on how long a connect attempt may block.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// A connected TCP stream to the bridge — implements Read + Write.
///
/// This is the fundamental I/O type the protocol layers run over. The bridge
/// speaks exactly one connection at a time; callers own the stream
/// exclusively.
pub struct BridgeStream {
    inner: TcpStream,
    peer: SocketAddr,
}

impl BridgeStream {
    /// Connect to the bridge with the default connect timeout.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_timeout(host, port, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Connect to the bridge with an explicit connect timeout.
    ///
    /// When `host` resolves to multiple addresses each is tried in turn; the
    /// timeout applies per attempt.
    pub fn connect_timeout(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();
        if addrs.is_empty() {
            return Err(TransportError::Resolve {
                host: host.to_string(),
                port,
            });
        }

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    debug!(%addr, "connected to bridge");
                    return Ok(Self {
                        inner: stream,
                        peer: addr,
                    });
                }
                Err(source) => last_err = Some(TransportError::Connect { addr, source }),
            }
        }

        // Non-empty addrs guarantees at least one attempt was made.
        Err(last_err.unwrap_or(TransportError::Resolve {
            host: host.to_string(),
            port,
        }))
    }

    /// The remote address this stream is connected to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Try to clone this stream (creates a new file descriptor).
    ///
    /// A cloned handle can shut the stream down while another handle is
    /// blocked in a read, which fails that read promptly.
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self.inner.try_clone()?;
        Ok(Self {
            inner: cloned,
            peer: self.peer,
        })
    }

    /// Shut down both directions of the stream.
    ///
    /// `NotConnected` from the OS is ignored so shutdown is idempotent.
    pub fn shutdown(&self) -> Result<()> {
        match self.inner.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

impl Read for BridgeStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for BridgeStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for BridgeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeStream")
            .field("peer", &self.peer)
            .finish()
    }
}
