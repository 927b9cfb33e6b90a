//! Serial transport for instruments on an RS-232C or USB-serial port.
//!
//! Uses the [`serialport`] crate in blocking mode. A read attempt first probes the driver's
//! receive buffer and only reads when bytes are already waiting, so a single attempt never blocks
//! for the full port timeout.

use std::io::{self, Read, Write};

use serialport::SerialPort;

use crate::{LinkError, ReadAttempt, Session, SerialParams, Transport};

/// A blocking serial port transport using the `serialport` crate.
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Try to open the serial port described by the parameters.
    ///
    /// Fails with the underlying [`serialport::Error`] if the port does not exist or cannot be
    /// configured.
    ///
    /// # Arguments
    /// * `params` - Port name, baud rate, and receive timeout.
    pub fn try_new(params: &SerialParams) -> Result<Self, LinkError> {
        let port = serialport::new(&params.port, params.baud_rate)
            .timeout(params.timeout)
            .open()?;
        Ok(SerialTransport { port: Some(port) })
    }

    /// Open the port and wrap it in a ready-to-use session.
    ///
    /// # Arguments
    /// * `params` - Port name, baud rate, and receive timeout.
    pub fn open(params: &SerialParams) -> Result<Session<Self>, LinkError> {
        Ok(Session::new(Self::try_new(params)?, params.timeout))
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, LinkError> {
        self.port.as_mut().ok_or_else(|| {
            LinkError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "serial port is closed",
            ))
        })
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        let port = self.port()?;
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn read_attempt(&mut self) -> Result<ReadAttempt, LinkError> {
        let port = self.port()?;
        let available = port.bytes_to_read()? as usize;
        if available == 0 {
            return Ok(ReadAttempt::Empty);
        }
        let mut chunk = vec![0u8; available];
        let len = port.read(&mut chunk)?;
        chunk.truncate(len);
        Ok(ReadAttempt::Data(chunk))
    }

    fn close(&mut self) -> Result<(), LinkError> {
        // Dropping the handle releases the port; a second close is a no-op.
        self.port.take();
        Ok(())
    }
}
