//! The session: the live, exclusively owned binding between a caller and one open transport.

use std::time::Duration;

use crate::{LinkError, Transport, framing, receiver};

/// A live connection to one instrument over one open transport.
///
/// A session owns its transport exclusively for its whole lifetime; it is created by one of the
/// transport open functions (or [`crate::ConnectionParams::open`]) and consumed by
/// [`Session::close`]. The receive timeout is resolved from the connection parameters at open
/// time and reused for every receive unless overridden per call.
///
/// Operations are synchronous and must not be issued concurrently against the same session: the
/// accumulation buffer is session-scoped mutable state with no internal locking.
pub struct Session<T: Transport> {
    transport: T,
    timeout: Duration,
    buf: Vec<u8>,
}

impl<T: Transport> Session<T> {
    /// Create a session over an already opened transport.
    ///
    /// # Arguments
    /// * `transport` - The open link; the session takes exclusive ownership.
    /// * `timeout` - Default receive timeout for queries on this session.
    pub fn new(transport: T, timeout: Duration) -> Self {
        Session {
            transport,
            timeout,
            buf: Vec::new(),
        }
    }

    /// The default receive timeout resolved at connect time.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a command to the instrument.
    ///
    /// The command is framed with the `CR LF` terminator and written to the transport. No
    /// response is read; use [`Session::query`] for commands that answer.
    ///
    /// # Arguments
    /// * `cmd` - The command text, without terminator.
    pub fn send(&mut self, cmd: &str) -> Result<(), LinkError> {
        self.transport.write(&framing::encode(cmd))
    }

    /// Send a command and wait for a terminated response within the session timeout.
    ///
    /// # Arguments
    /// * `cmd` - The command text, without terminator.
    pub fn query(&mut self, cmd: &str) -> Result<String, LinkError> {
        let timeout = self.timeout;
        self.query_with_timeout(cmd, timeout)
    }

    /// Send a command and wait for a terminated response within an explicit timeout.
    ///
    /// If the send fails, the query fails immediately without attempting to receive. A timed-out
    /// or failed query is not resumable: re-issue it from scratch, the next receive starts with
    /// an empty buffer.
    ///
    /// # Arguments
    /// * `cmd` - The command text, without terminator.
    /// * `timeout` - Receive timeout for this call only.
    pub fn query_with_timeout(&mut self, cmd: &str, timeout: Duration) -> Result<String, LinkError> {
        self.send(cmd)?;
        receiver::read_line(&mut self.transport, &mut self.buf, timeout).map_err(|err| match err {
            LinkError::Timeout(timeout) => LinkError::TimeoutQuery {
                query: cmd.to_string(),
                timeout,
            },
            other => other,
        })
    }

    /// Wait for a terminated response without sending anything first.
    ///
    /// Useful for instruments that push unsolicited lines. Uses the session timeout.
    pub fn receive(&mut self) -> Result<String, LinkError> {
        let timeout = self.timeout;
        receiver::read_line(&mut self.transport, &mut self.buf, timeout)
    }

    /// Close the session and release the transport.
    ///
    /// Consumes the session, so it cannot be used afterwards. Safe to call on a degraded link;
    /// any release error is returned as a value.
    pub fn close(mut self) -> Result<(), LinkError> {
        self.transport.close()
    }
}
