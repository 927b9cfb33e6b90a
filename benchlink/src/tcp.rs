//! TCP transport for instruments on a LAN interface.
//!
//! Uses [`std::net::TcpStream`] in non-blocking mode for reads, so a single read attempt pulls
//! whatever the socket has buffered and otherwise reports that nothing is available yet. Nagle's
//! algorithm is disabled: commands are short and should go out immediately.

use std::{
    io::{self, Read, Write},
    net::{Shutdown, TcpStream},
};

use crate::{LinkError, ReadAttempt, Session, TcpParams, Transport};

const READ_CHUNK: usize = 4096;

/// A TCP socket transport using [`std::net::TcpStream`].
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Try to connect to the instrument's TCP port.
    ///
    /// The host may be a dotted-decimal address or a hostname; resolution happens here. Fails
    /// with the underlying [`std::io::Error`] if the host does not resolve or refuses the
    /// connection.
    ///
    /// # Arguments
    /// * `params` - Host, port, and receive timeout.
    pub fn try_new(params: &TcpParams) -> Result<Self, LinkError> {
        let stream = TcpStream::connect((params.host.as_str(), params.port))?;
        stream.set_nodelay(true)?;
        // A zero receive timeout is legal (poll once, give up); std rejects it as a socket
        // write timeout, so only bound writes for nonzero windows.
        if !params.timeout.is_zero() {
            stream.set_write_timeout(Some(params.timeout))?;
        }
        stream.set_nonblocking(true)?;
        Ok(TcpTransport { stream })
    }

    /// Connect and wrap the socket in a ready-to-use session.
    ///
    /// # Arguments
    /// * `params` - Host, port, and receive timeout.
    pub fn open(params: &TcpParams) -> Result<Session<Self>, LinkError> {
        Ok(Session::new(Self::try_new(params)?, params.timeout))
    }
}

impl Transport for TcpTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        // The socket is non-blocking for the polling reads; short command writes go through the
        // kernel send buffer, so a WouldBlock here means the link is genuinely backed up and is
        // reported as a write failure.
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        Ok(())
    }

    fn read_attempt(&mut self) -> Result<ReadAttempt, LinkError> {
        let mut chunk = vec![0u8; READ_CHUNK];
        match self.stream.read(&mut chunk) {
            Ok(0) => Err(LinkError::Io(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "connection closed by instrument",
            ))),
            Ok(len) => {
                chunk.truncate(len);
                Ok(ReadAttempt::Data(chunk))
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(ReadAttempt::Empty),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(ReadAttempt::Signal),
            Err(err) => Err(err.into()),
        }
    }

    fn close(&mut self) -> Result<(), LinkError> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Double close: the peer or an earlier close already tore the link down.
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
