//! GPIB transport through a VISA installation.
//!
//! Opens the instrument as a VISA resource (`GPIB{board}::{address}::INSTR`) via the `visa-rs`
//! crate. The open itself performs the bus-level checks: it fails when the board is absent, not
//! the controller-in-charge, or the address does not answer.
//!
//! GPIB drivers report an in-progress read as a timeout-flavored condition rather than delivering
//! partial data the way a socket does. The open therefore sets the instrument's VISA I/O timeout
//! (`VI_ATTR_TMO_VALUE`) to a few milliseconds so each read attempt returns quickly, and a read
//! attempt classifies that condition as [`ReadAttempt::Signal`] (a poll hint, not a failure).
//! Only genuine I/O errors abort the receive loop; the wall clock in the shared receive loop
//! enforces the configured timeout.

use std::{
    ffi::CString,
    io::{self, Read, Write},
};

use visa_rs::{
    enums::attribute::{AttrTmoValue, HasAttribute},
    flags::AccessMode,
    vs::ViUInt32,
    AsResourceManager, DefaultRM, Instrument, TIMEOUT_IMMEDIATE,
};

use crate::{GpibParams, LinkError, ReadAttempt, Session, Transport};

const READ_CHUNK: usize = 4096;

// Driver-level timeout per read call, in milliseconds. Without it VISA blocks each viRead for
// its 2000 ms default, which would make a single poll outlast most receive timeouts.
const READ_POLL_TIMEOUT_MS: ViUInt32 = 10;

/// A GPIB transport over a VISA instrument handle.
pub struct GpibTransport {
    // The resource manager must outlive the instrument handle.
    _rm: DefaultRM,
    instr: Option<Instrument>,
}

impl GpibTransport {
    /// Try to open the instrument at the given board and primary address.
    ///
    /// Fails with the underlying VISA error if the resource manager cannot start, the board is
    /// not present or not in control of the bus, or the device does not respond to addressing.
    ///
    /// # Arguments
    /// * `params` - Board index, primary address, and receive timeout.
    pub fn try_new(params: &GpibParams) -> Result<Self, LinkError> {
        let rm = DefaultRM::new()?;
        let resource = format!("GPIB{}::{}::INSTR", params.board, params.address);
        let resource = CString::new(resource)
            .map_err(|_| LinkError::InvalidParameter {
                field: "resource name",
                value: format!("GPIB{}::{}::INSTR", params.board, params.address),
            })?
            .into();
        let instr = rm.open(&resource, AccessMode::NO_LOCK, TIMEOUT_IMMEDIATE)?;
        // TIMEOUT_IMMEDIATE above only bounds the open itself; reads keep their own timeout.
        let poll_timeout = AttrTmoValue::new_checked(READ_POLL_TIMEOUT_MS).ok_or_else(|| {
            LinkError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "poll timeout out of range for VI_ATTR_TMO_VALUE",
            ))
        })?;
        instr.set_attr(poll_timeout)?;
        Ok(GpibTransport {
            _rm: rm,
            instr: Some(instr),
        })
    }

    /// Open the instrument and wrap it in a ready-to-use session.
    ///
    /// # Arguments
    /// * `params` - Board index, primary address, and receive timeout.
    pub fn open(params: &GpibParams) -> Result<Session<Self>, LinkError> {
        Ok(Session::new(Self::try_new(params)?, params.timeout))
    }

    fn instr(&mut self) -> Result<&Instrument, LinkError> {
        self.instr.as_ref().ok_or_else(|| {
            LinkError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "GPIB device is closed",
            ))
        })
    }
}

impl Transport for GpibTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        let mut instr = self.instr()?;
        instr.write_all(bytes)?;
        Ok(())
    }

    fn read_attempt(&mut self) -> Result<ReadAttempt, LinkError> {
        let mut instr = self.instr()?;
        let mut chunk = vec![0u8; READ_CHUNK];
        match instr.read(&mut chunk) {
            Ok(len) => {
                chunk.truncate(len);
                Ok(ReadAttempt::Data(chunk))
            }
            // The driver-level timeout: the transfer has not completed yet. Retry; the wall
            // clock in the receive loop decides when to give up.
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) =>
            {
                Ok(ReadAttempt::Signal)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn close(&mut self) -> Result<(), LinkError> {
        // Dropping the handle releases the device; a second close is a no-op.
        self.instr.take();
        Ok(())
    }
}
