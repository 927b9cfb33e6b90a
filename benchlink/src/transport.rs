//! The transport seam between the shared protocol logic and the physical links.

use crate::LinkError;

/// Outcome of a single read attempt on a transport.
///
/// Each adapter maps its native conditions onto this three-way result before anything reaches the
/// shared receive loop. The crux of every adapter lives in this classification: a condition that
/// merely means "no data yet" must become [`ReadAttempt::Empty`] or [`ReadAttempt::Signal`], never
/// an error, while a genuine link failure must surface as an error immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadAttempt {
    /// Bytes pulled from the link on this attempt.
    Data(Vec<u8>),
    /// Nothing was available; try again.
    Empty,
    /// A transport-native "operation not yet complete" condition; try again. Distinct from
    /// [`ReadAttempt::Empty`] only in provenance: the receive loop treats both as a retry hint,
    /// and neither ever surfaces to the caller.
    Signal,
}

/// A physical link to an instrument.
///
/// Implementations perform a blocking write and a single bounded-cost read attempt; the
/// accumulate-until-terminator-or-timeout loop on top is transport-independent (see the crate's
/// query operations). Implementors must keep `close` safe to call on an already released or
/// degraded link: errors are returned as values, never panics.
pub trait Transport {
    /// Blocking write of an already framed command to the link.
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Perform one attempt to pull whatever bytes are currently available.
    fn read_attempt(&mut self) -> Result<ReadAttempt, LinkError>;

    /// Release the link. Calling this more than once must not crash.
    fn close(&mut self) -> Result<(), LinkError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        (**self).write(bytes)
    }

    fn read_attempt(&mut self) -> Result<ReadAttempt, LinkError> {
        (**self).read_attempt()
    }

    fn close(&mut self) -> Result<(), LinkError> {
        (**self).close()
    }
}
