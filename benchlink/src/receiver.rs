//! The timed receive loop shared by all transports.

use std::{
    thread,
    time::{Duration, Instant},
};

use crate::{LinkError, ReadAttempt, Transport, framing};

/// Sleep between idle read attempts so the cooperative poll does not spin hot.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Accumulate read attempts until a terminated line arrives or the timeout expires.
///
/// The accumulation buffer is cleared on entry, so no state leaks between receive operations.
/// Instruments may deliver a response across many small reads with no alignment to message
/// boundaries, and the terminator itself may arrive split across attempts; the elapsed-time check
/// therefore runs after every attempt rather than relying on a single blocking read. On timeout
/// the partial accumulation is discarded, not returned.
///
/// # Arguments
/// * `transport` - The link to poll.
/// * `buf` - Accumulation buffer, reused across calls to avoid reallocating.
/// * `timeout` - Wall-clock budget for the whole multi-read operation.
pub(crate) fn read_line<T: Transport + ?Sized>(
    transport: &mut T,
    buf: &mut Vec<u8>,
    timeout: Duration,
) -> Result<String, LinkError> {
    buf.clear();
    let tic = Instant::now();

    loop {
        match transport.read_attempt()? {
            ReadAttempt::Data(chunk) => {
                framing::append_stripped(buf, &chunk);
                if let Some(line) = framing::take_line(buf) {
                    return Ok(line);
                }
            }
            ReadAttempt::Empty | ReadAttempt::Signal => thread::sleep(POLL_INTERVAL),
        }

        if tic.elapsed() > timeout {
            return Err(LinkError::Timeout(timeout));
        }
    }
}
