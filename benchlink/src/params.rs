//! Connection parameters and their coercion from operator-supplied text.
//!
//! Front ends hand over every parameter as text; the `parse` constructors coerce them to typed
//! form and report a [`LinkError::InvalidParameter`] instead of crashing on bad input. Parameters
//! are immutable once a session has been opened with them.

use std::{str::FromStr, time::Duration};

use crate::{LinkError, Session, Transport};

/// Coerce one text field, naming the field in the error on failure.
fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, LinkError> {
    value
        .trim()
        .parse()
        .map_err(|_| LinkError::InvalidParameter {
            field,
            value: value.to_string(),
        })
}

/// Coerce a timeout given in whole seconds.
fn parse_timeout(value: &str) -> Result<Duration, LinkError> {
    let seconds: u64 = parse_field("timeout", value)?;
    Ok(Duration::from_secs(seconds))
}

/// Parameters for a GPIB connection: board index, primary address, receive timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpibParams {
    /// Board index of the GPIB interface, e.g. `0` for `GPIB0`.
    pub board: i32,
    /// Primary address of the instrument on the bus (0-255).
    pub address: u8,
    /// Receive timeout for queries.
    pub timeout: Duration,
}

impl GpibParams {
    /// Coerce GPIB parameters from text fields.
    ///
    /// # Arguments
    /// * `board` - Board index as text, e.g. `"0"`.
    /// * `address` - Primary address as text, `0` through `255`.
    /// * `timeout_s` - Receive timeout in whole seconds, e.g. `"2"`.
    pub fn parse(board: &str, address: &str, timeout_s: &str) -> Result<Self, LinkError> {
        Ok(GpibParams {
            board: parse_field("board id", board)?,
            address: parse_field("primary address", address)?,
            timeout: parse_timeout(timeout_s)?,
        })
    }
}

#[cfg(feature = "serial")]
/// Parameters for an RS-232C/USB serial connection: port name, baud rate, receive timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialParams {
    /// Name of the serial port, e.g. `"/dev/ttyUSB0"` or `"COM3"`.
    pub port: String,
    /// Baud rate, e.g. `9600`.
    pub baud_rate: u32,
    /// Receive timeout for queries.
    pub timeout: Duration,
}

#[cfg(feature = "serial")]
impl SerialParams {
    /// Coerce serial parameters from text fields.
    ///
    /// # Arguments
    /// * `port` - Port name; taken as-is.
    /// * `baud_rate` - Baud rate as text, e.g. `"9600"`.
    /// * `timeout_s` - Receive timeout in whole seconds, e.g. `"2"`.
    pub fn parse(port: &str, baud_rate: &str, timeout_s: &str) -> Result<Self, LinkError> {
        Ok(SerialParams {
            port: port.to_string(),
            baud_rate: parse_field("baud rate", baud_rate)?,
            timeout: parse_timeout(timeout_s)?,
        })
    }
}

/// Parameters for a LAN/TCP connection: host, port, receive timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpParams {
    /// Dotted-decimal address or hostname of the instrument.
    pub host: String,
    /// TCP port (0-65535).
    pub port: u16,
    /// Receive timeout for queries.
    pub timeout: Duration,
}

impl TcpParams {
    /// Coerce TCP parameters from text fields.
    ///
    /// The host is taken as-is and resolved when the connection is opened, so both dotted-decimal
    /// addresses and hostnames are accepted.
    ///
    /// # Arguments
    /// * `host` - Address or hostname; taken as-is.
    /// * `port` - Port number as text, `0` through `65535`.
    /// * `timeout_s` - Receive timeout in whole seconds, e.g. `"2"`.
    pub fn parse(host: &str, port: &str, timeout_s: &str) -> Result<Self, LinkError> {
        Ok(TcpParams {
            host: host.to_string(),
            port: parse_field("port", port)?,
            timeout: parse_timeout(timeout_s)?,
        })
    }
}

/// Connection parameters for any of the supported transports.
///
/// Useful for callers that select the transport at runtime; [`ConnectionParams::open`] yields a
/// session over a boxed transport. Callers that know their transport at compile time can use the
/// transport open functions directly, e.g. [`crate::TcpTransport::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConnectionParams {
    #[cfg(feature = "gpib")]
    /// GPIB via a VISA installation.
    Gpib(GpibParams),
    #[cfg(feature = "serial")]
    /// RS-232C/USB serial port.
    Serial(SerialParams),
    /// LAN/TCP socket.
    Tcp(TcpParams),
}

impl ConnectionParams {
    /// The receive timeout carried by the parameters.
    pub fn timeout(&self) -> Duration {
        match self {
            #[cfg(feature = "gpib")]
            ConnectionParams::Gpib(p) => p.timeout,
            #[cfg(feature = "serial")]
            ConnectionParams::Serial(p) => p.timeout,
            ConnectionParams::Tcp(p) => p.timeout,
        }
    }

    /// Open the physical link described by these parameters.
    ///
    /// Returns a session over a boxed transport, so the same caller code works for every
    /// transport variant.
    pub fn open(&self) -> Result<Session<Box<dyn Transport + Send>>, LinkError> {
        let transport: Box<dyn Transport + Send> = match self {
            #[cfg(feature = "gpib")]
            ConnectionParams::Gpib(p) => Box::new(crate::GpibTransport::try_new(p)?),
            #[cfg(feature = "serial")]
            ConnectionParams::Serial(p) => Box::new(crate::SerialTransport::try_new(p)?),
            ConnectionParams::Tcp(p) => Box::new(crate::TcpTransport::try_new(p)?),
        };
        Ok(Session::new(transport, self.timeout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpib_params_coercion() {
        let params = GpibParams::parse("0", "5", "2").unwrap();
        assert_eq!(params.board, 0);
        assert_eq!(params.address, 5);
        assert_eq!(params.timeout, Duration::from_millis(2000));
    }

    #[test]
    fn test_gpib_address_out_of_range() {
        match GpibParams::parse("0", "256", "2") {
            Err(LinkError::InvalidParameter { field, value }) => {
                assert_eq!(field, "primary address");
                assert_eq!(value, "256");
            }
            other => panic!("Expected invalid parameter error, got {other:?}"),
        }
    }

    #[cfg(feature = "serial")]
    #[test]
    fn test_serial_params_coercion() {
        let params = SerialParams::parse("/dev/ttyUSB0", "9600", "3").unwrap();
        assert_eq!(params.port, "/dev/ttyUSB0");
        assert_eq!(params.baud_rate, 9600);
        assert_eq!(params.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_tcp_params_coercion() {
        let params = TcpParams::parse("192.168.0.10", "8802", "2").unwrap();
        assert_eq!(params.host, "192.168.0.10");
        assert_eq!(params.port, 8802);

        assert!(TcpParams::parse("192.168.0.10", "88020", "2").is_err());
        assert!(TcpParams::parse("192.168.0.10", "8802", "soon").is_err());
    }

    #[test]
    fn test_huge_timeout_does_not_panic() {
        let max = u64::MAX.to_string();
        let params = TcpParams::parse("logger.local", "8802", &max).unwrap();
        assert_eq!(params.timeout, Duration::from_secs(u64::MAX));

        // One past u64::MAX is no longer coercible and must be rejected, not crash.
        assert!(TcpParams::parse("logger.local", "8802", "18446744073709551616").is_err());
    }

    #[test]
    fn test_whitespace_tolerated_in_numeric_fields() {
        let params = TcpParams::parse("logger.local", " 8802 ", " 2 ").unwrap();
        assert_eq!(params.port, 8802);
        assert_eq!(params.timeout, Duration::from_secs(2));
    }
}
