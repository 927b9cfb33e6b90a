//! A scripted loopback transport for testing without hardware.
//!
//! The [`LoopbackTransport`] plays the instrument's side of a conversation: you script the
//! commands expected from the host and the read attempts the instrument answers with. Replies can
//! be split into arbitrary chunks and interleaved with retry conditions, which is exactly the
//! traffic shape the receive loop exists to handle.
//!
//! Whenever the host sends something that was not scripted, the transport panics. When it is
//! dropped with scripted items left over, it panics as well, so a test cannot silently skip part
//! of its conversation.

use std::collections::VecDeque;

use crate::{LinkError, ReadAttempt, Transport, framing};

/// One scripted answer to a read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Deliver these bytes, exactly as scripted (no terminator is appended).
    Chunk(Vec<u8>),
    /// Report that nothing is available yet.
    Empty,
    /// Report a transport-native retry condition.
    Signal,
}

/// A self-incrementing index that starts at 0 and increments whenever `next` is called.
#[derive(Debug, Default)]
struct IncrIndex {
    index: usize,
}

impl IncrIndex {
    fn next(&mut self) -> usize {
        let current = self.index;
        self.index += 1;
        current
    }
}

/// A transport that checks outgoing commands and plays back scripted read attempts.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use benchlink::{LoopbackTransport, Session};
///
/// let loopback = LoopbackTransport::new(vec!["*IDN?"], vec!["ACME,MODEL1"]);
/// let mut session = Session::new(loopback, Duration::from_secs(1));
/// assert_eq!("ACME,MODEL1", session.query("*IDN?").unwrap());
/// session.close().unwrap();
/// ```
pub struct LoopbackTransport {
    from_host: Vec<String>,
    from_host_index: IncrIndex,
    replies: VecDeque<Reply>,
}

impl LoopbackTransport {
    /// Create a loopback for a simple line-by-line conversation.
    ///
    /// Commands and responses are given without terminators: the expected commands get the
    /// `CR LF` send terminator appended before matching, and each response is delivered as one
    /// chunk with `CR LF` appended, the way a well-behaved instrument answers.
    ///
    /// # Arguments
    /// * `from_host` - Commands expected from host to instrument, in order.
    /// * `from_inst` - Response lines from instrument to host, in order.
    pub fn new(from_host: Vec<&str>, from_inst: Vec<&str>) -> Self {
        let replies = from_inst
            .into_iter()
            .map(|line| Reply::Chunk(format!("{line}{}", framing::TERMINATOR).into_bytes()))
            .collect();
        Self::with_replies(from_host, replies)
    }

    /// Create a loopback with full control over the scripted read attempts.
    ///
    /// Use this to split a response across chunks, place `CR` bytes anywhere in the stream, or
    /// interleave [`Reply::Empty`]/[`Reply::Signal`] retry conditions. Chunks are delivered
    /// byte-for-byte as scripted.
    ///
    /// # Arguments
    /// * `from_host` - Commands expected from host to instrument, in order (terminator appended
    ///   before matching).
    /// * `replies` - Scripted read attempts, in order. Once exhausted, further read attempts
    ///   report [`ReadAttempt::Empty`] forever, which is how a silent instrument is scripted.
    pub fn with_replies(from_host: Vec<&str>, replies: Vec<Reply>) -> Self {
        LoopbackTransport {
            from_host: from_host.into_iter().map(str::to_string).collect(),
            from_host_index: IncrIndex::default(),
            replies: replies.into(),
        }
    }

    /// Panic if scripted commands or replies are left unused.
    ///
    /// Called automatically on drop (unless the thread is already panicking), but can be called
    /// manually to check the conversation completed.
    pub fn finalize(&mut self) {
        if let Some(leftover) = self.from_host.get(self.from_host_index.next()) {
            panic!("Leftover expected commands found from host to instrument: {leftover}");
        }
        if let Some(leftover) = self.replies.front() {
            panic!("Leftover scripted replies found from instrument to host: {leftover:?}");
        }
    }
}

impl Transport for LoopbackTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        let expected = self
            .from_host
            .get(self.from_host_index.next())
            .map(|cmd| format!("{cmd}{}", framing::TERMINATOR))
            .expect("No more commands were expected from host to instrument.");
        assert_eq!(
            expected.as_bytes(),
            bytes,
            "Expected command '{expected:?}', got '{:?}'",
            String::from_utf8_lossy(bytes)
        );
        Ok(())
    }

    fn read_attempt(&mut self) -> Result<ReadAttempt, LinkError> {
        match self.replies.pop_front() {
            Some(Reply::Chunk(bytes)) => Ok(ReadAttempt::Data(bytes)),
            Some(Reply::Empty) | None => Ok(ReadAttempt::Empty),
            Some(Reply::Signal) => Ok(ReadAttempt::Signal),
        }
    }

    fn close(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            self.finalize();
        }
    }
}

// Tests of internal functionality
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incrementing_index() {
        let mut idx = IncrIndex::default();
        assert_eq!(0, idx.next());
        assert_eq!(1, idx.next());
        assert_eq!(2, idx.next());
    }
}
