use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, error, info};

use peribus_frame::{encode_frame, Command};
use peribus_transport::{BridgeStream, TransportError, DEFAULT_CONNECT_TIMEOUT};

use crate::error::{LinkError, Result};
use crate::spi::{SpiOpcode, MAX_BUSY_POLLS};

/// The exact acknowledgment text the firmware sends after a connection probe.
pub const ACK_TEXT: &str = "acknowledged";

/// Fixed sub-address used by the firmware debug toggle.
pub const DEBUG_ADDRESS: u8 = 0x01;

/// Default receive buffer size; responses never exceed one TCP segment.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Configuration for a device link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Bound on how long a connect attempt may block.
    pub connect_timeout: Duration,
    /// Read timeout applied to the stream. Firmware silence would otherwise
    /// hang a response read indefinitely.
    pub read_timeout: Option<Duration>,
    /// Write timeout applied to the stream.
    pub write_timeout: Option<Duration>,
    /// Receive buffer size for raw response reads.
    pub recv_buffer: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: Some(Duration::from_secs(2)),
            write_timeout: Some(Duration::from_secs(2)),
            recv_buffer: RECV_BUFFER_SIZE,
        }
    }
}

/// A synchronous request/response link to the bridge firmware.
///
/// Owns its stream exclusively for the lifetime of the connection. Any
/// transport failure or protocol violation drops the connection; callers see
/// the error and the link reports `NotConnected` afterwards. The generic
/// stream parameter exists so protocol behavior can be exercised against
/// in-memory streams; production code uses [`DeviceLink::connect`].
#[derive(Debug)]
pub struct DeviceLink<S> {
    stream: Option<S>,
    config: LinkConfig,
    buf: BytesMut,
}

impl DeviceLink<BridgeStream> {
    /// Connect to the bridge and perform the handshake.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_with_config(host, port, LinkConfig::default())
    }

    /// Connect with explicit configuration.
    ///
    /// Opens the TCP stream within `connect_timeout`, applies the stream
    /// timeouts, then sends a `Connecting` frame and requires the literal
    /// `acknowledged` reply. On any failure the link is torn down; no partial
    /// state is returned.
    pub fn connect_with_config(host: &str, port: u16, config: LinkConfig) -> Result<Self> {
        let stream = BridgeStream::connect_timeout(host, port, config.connect_timeout)?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;

        let mut link = Self::from_stream_with_config(stream, config);
        link.handshake()?;
        info!(host, port, "bridge link established");
        Ok(link)
    }
}

impl<S: Read + Write> DeviceLink<S> {
    /// Wrap an already-connected stream without performing the handshake.
    pub fn from_stream(stream: S) -> Self {
        Self::from_stream_with_config(stream, LinkConfig::default())
    }

    /// Wrap an already-connected stream with explicit configuration.
    pub fn from_stream_with_config(stream: S, config: LinkConfig) -> Self {
        Self {
            stream: Some(stream),
            config,
            buf: BytesMut::with_capacity(64),
        }
    }

    /// Send the connection probe and require the firmware acknowledgment.
    ///
    /// On mismatch or any transport failure the link disconnects and the
    /// error is returned.
    pub fn handshake(&mut self) -> Result<()> {
        self.send(Command::Connecting, 0, &[])?;
        let reply = self.recv()?;
        if reply != ACK_TEXT.as_bytes() {
            let text = String::from_utf8_lossy(&reply).into_owned();
            error!(reply = %text, "bridge did not acknowledge connection probe");
            self.disconnect();
            return Err(LinkError::HandshakeFailed(format!(
                "expected '{ACK_TEXT}', got '{text}'"
            )));
        }
        debug!("bridge acknowledged connection probe");
        Ok(())
    }

    /// Liveness check: re-runs the handshake probe against the firmware.
    ///
    /// This is NOT a passive query — it exercises the protocol, and a failed
    /// probe leaves the link disconnected. The firmware offers no cheaper
    /// liveness primitive.
    pub fn is_connected(&mut self) -> bool {
        if self.stream.is_none() {
            return false;
        }
        self.handshake().is_ok()
    }

    /// Close the link. Idempotent; safe to call when never connected.
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            debug!("bridge link closed");
        }
    }

    /// Encode a command and write the frame to the stream.
    ///
    /// A write failure drops the connection; bytes after a failed write must
    /// not be assumed delivered.
    pub fn send(&mut self, command: Command, address: u8, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(command, address, payload, &mut self.buf)?;

        let result = match self.stream.as_mut() {
            Some(stream) => write_all(stream, &self.buf),
            None => return Err(LinkError::NotConnected),
        };
        if let Err(err) = result {
            error!(?command, address, %err, "send failed; dropping connection");
            self.disconnect();
            return Err(err);
        }
        Ok(())
    }

    /// Read one raw response, up to the configured buffer size.
    ///
    /// Response formats differ per command; interpretation is left to the
    /// operation that issued the request.
    pub fn recv(&mut self) -> Result<Vec<u8>> {
        let recv_buffer = self.config.recv_buffer;
        let result = match self.stream.as_mut() {
            Some(stream) => read_chunk(stream, recv_buffer),
            None => return Err(LinkError::NotConnected),
        };
        match result {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                error!(%err, "receive failed; dropping connection");
                self.disconnect();
                Err(err)
            }
        }
    }

    /// Drive a GPIO pin. No response is read.
    pub fn gpio_write(&mut self, address: u8, data: &[u8]) -> Result<()> {
        self.send(Command::GpioWrite, address, data)
    }

    /// Sample a GPIO pin and return the raw response bytes.
    pub fn gpio_read(&mut self, address: u8) -> Result<Vec<u8>> {
        self.send(Command::GpioRead, address, &[])?;
        self.recv()
    }

    /// Configure the I2C clock in Hz. The firmware expects this at sub-address 1.
    pub fn i2c_config(&mut self, clock_hz: u32) -> Result<()> {
        self.send(Command::I2cConf, 1, &clock_hz.to_be_bytes())
    }

    /// Write bytes to an I2C target. No response is read.
    pub fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<()> {
        self.send(Command::I2cWrite, address, data)
    }

    /// Read `count` bytes from an I2C target and return the raw response.
    pub fn i2c_read(&mut self, address: u8, count: u32) -> Result<Vec<u8>> {
        self.send(Command::I2cRead, address, &count.to_be_bytes())?;
        self.recv()
    }

    /// Configure SPI mode and clock. The clock is truncated to whole Hz, as
    /// the firmware only accepts an integer rate.
    pub fn spi_config(&mut self, mode: u8, clock_hz: f64) -> Result<()> {
        let clock = clock_hz as u32;
        self.send(Command::SpiConf, mode, &clock.to_be_bytes())
    }

    /// Sample an ADC channel and return the raw response bytes.
    ///
    /// The sample comes back as a big-endian integer; scaling to a voltage is
    /// left to the caller (see `peribus_frame::be_uint`).
    pub fn adc_read(&mut self, address: u8) -> Result<Vec<u8>> {
        self.send(Command::AdcRead, address, &[])?;
        self.recv()
    }

    /// Toggle firmware debug output.
    pub fn set_debug(&mut self, enabled: bool) -> Result<()> {
        let flag = u32::from(enabled);
        self.send(Command::Debug, DEBUG_ADDRESS, &flag.to_be_bytes())
    }

    /// Full-duplex SPI transfer with busy-wait.
    ///
    /// The SPI target may still be committing a previous write; its status
    /// register is probed first (`RDSR`, busy = bit 0 of the second response
    /// byte) and re-probed up to [`MAX_BUSY_POLLS`] times. A target that
    /// never reports ready fails with [`LinkError::BusyTimeout`] without the
    /// data payload ever being written.
    pub fn spi_transfer(&mut self, address: u8, data: &[u8]) -> Result<Vec<u8>> {
        let probe = [SpiOpcode::Rdsr.as_byte(), 0x00];

        let mut polls = 0u8;
        loop {
            self.send(Command::SpiReadWrite, address, &probe)?;
            let status = self.recv()?;
            let status_byte = status.get(1).copied().ok_or_else(|| {
                LinkError::MalformedResponse(format!(
                    "spi status reply of {} bytes (need at least 2)",
                    status.len()
                ))
            })?;

            polls += 1;
            if status_byte & 0x01 == 0 {
                break;
            }
            if polls == MAX_BUSY_POLLS {
                return Err(LinkError::BusyTimeout { polls });
            }
            debug!(polls, address, "spi target busy, re-probing");
        }

        self.send(Command::SpiReadWrite, address, data)?;
        self.recv()
    }

    /// Current link configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }
}

fn write_all<S: Write>(stream: &mut S, mut bytes: &[u8]) -> Result<()> {
    while !bytes.is_empty() {
        match stream.write(bytes) {
            Ok(0) => {
                return Err(LinkError::Disconnected(
                    "write returned zero bytes".to_string(),
                ))
            }
            Ok(n) => bytes = &bytes[n..],
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err).into()),
        }
    }
    loop {
        match stream.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err).into()),
        }
    }
}

fn read_chunk<S: Read>(stream: &mut S, capacity: usize) -> Result<Vec<u8>> {
    let mut chunk = vec![0u8; capacity];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => {
                return Err(LinkError::Disconnected(
                    "bridge closed the connection".to_string(),
                ))
            }
            Ok(n) => {
                chunk.truncate(n);
                return Ok(chunk);
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err).into()),
        }
    }
}
