//! Benchlink: send ASCII commands to bench instruments and read back responses.
//!
//! Benchlink implements the command/response protocol spoken by bench instruments that accept
//! line-terminated ASCII commands over GPIB, RS-232C/USB serial, or LAN/TCP. A command is framed
//! with a `CR LF` terminator and written to the instrument; if the command is a query (it contains
//! a `?`), the response is accumulated from partial reads until an `LF` terminator arrives or a
//! wall-clock timeout expires.
//!
//! The library is built around a small set of pieces:
//! - A [`Transport`] trait with one adapter per physical link. Each adapter classifies its native
//!   read conditions into a three-way [`ReadAttempt`] result, so the shared receive loop never
//!   sees transport-specific quirks.
//! - A [`Session`] that exclusively owns one open transport and drives send/query/close.
//! - A [`CommandShell`] facade for front ends that only want to hand over operator-typed text and
//!   display whatever comes back.
//! - A [`LoopbackTransport`] that lets you script instrument traffic in tests.
//!
//! # Currently implemented transports
//! - TCP/IP (blocking) using [`std::net::TcpStream`].
//! - Serial (blocking) using the [`serialport`] crate, behind the default `serial` feature.
//! - GPIB through a VISA installation using the `visa-rs` crate, behind the `gpib` feature. This
//!   feature is off by default as it requires a system VISA library.
//!
//! # Example
//!
//! ```no_run
//! use benchlink::{CommandShell, ConnectionParams, TcpParams};
//!
//! let params = ConnectionParams::Tcp(TcpParams::parse("192.168.0.10", "8802", "2").unwrap());
//!
//! let mut shell: CommandShell = CommandShell::new();
//! shell.connect(&params).unwrap();
//! println!("{}", shell.send_or_query("*IDN?"));
//! shell.disconnect().unwrap();
//! ```
//!
//! # Concurrency
//!
//! A [`Session`] is synchronous and single-operation: do not issue concurrent queries against the
//! same session. A front end that needs to stay responsive should run each query on a worker it
//! manages and serialize access to the session; cancellation is expressed purely through the
//! receive timeout.

#![warn(missing_docs)]

mod framing;
#[cfg(feature = "gpib")]
mod gpib;
mod loopback;
mod params;
mod receiver;
#[cfg(feature = "serial")]
mod serial;
mod session;
mod shell;
mod tcp;
mod transport;

#[cfg(feature = "gpib")]
pub use gpib::GpibTransport;
pub use loopback::{LoopbackTransport, Reply};
#[cfg(feature = "serial")]
pub use params::SerialParams;
pub use params::{ConnectionParams, GpibParams, TcpParams};
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
pub use session::Session;
pub use shell::{CommandShell, STATUS_ERROR, STATUS_TIMEOUT};
pub use tcp::TcpTransport;
pub use transport::{ReadAttempt, Transport};

use std::time::Duration;

use thiserror::Error;

/// The error enum for all link operations.
///
/// Connecting, sending, and querying return either an empty result or the requested response with
/// this error as the alternative, so errors propagate nicely with the `?` operator. Timeouts are
/// separate variants from transport failures: a caller (and the operator behind it) needs to
/// distinguish "the instrument stayed silent" from "the link broke."
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LinkError {
    /// A connection parameter supplied as text could not be coerced to its typed form. Contains
    /// the name of the parameter and the text that was rejected.
    #[error("Invalid value for parameter {field}: '{value}'")]
    InvalidParameter {
        /// Name of the parameter that was rejected.
        field: &'static str,
        /// The text that could not be coerced.
        value: String,
    },
    /// Error when reading from/writing to a transport. See [`std::io::Error`] for more details.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serial")]
    /// Serial port errors can occur when opening a serial interface. See the [`serialport::Error`]
    /// documentation for more information.
    #[error(transparent)]
    Serialport(#[from] serialport::Error),
    #[cfg(feature = "gpib")]
    /// VISA errors can occur when opening or talking to a GPIB device. See the `visa-rs`
    /// documentation for more information.
    #[error(transparent)]
    Visa(#[from] visa_rs::Error),
    /// Timeout occurred while waiting for a terminated response from the instrument. The error
    /// contains the timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response from the instrument. Timeout was set to {0:?}."
    )]
    Timeout(Duration),
    /// Timeout occurred while waiting for a response to a query. The error contains the query
    /// that was sent and the timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response to query: {query}. Timeout was set to {timeout:?}."
    )]
    TimeoutQuery {
        /// The query that timed out.
        query: String,
        /// The timeout that was set.
        timeout: Duration,
    },
}

impl LinkError {
    /// Whether this error is a receive timeout, as opposed to a genuine transport failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, LinkError::Timeout(_) | LinkError::TimeoutQuery { .. })
    }
}
