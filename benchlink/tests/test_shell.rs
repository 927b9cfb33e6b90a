//! Tests for the front-end facade, in particular its literal status-string contract.

use std::{net::TcpListener, time::Duration};

use rstest::*;

use benchlink::{
    CommandShell, ConnectionParams, LinkError, LoopbackTransport, ReadAttempt, Session, TcpParams,
    Transport, STATUS_ERROR, STATUS_TIMEOUT,
};

/// A transport whose link is broken: every operation fails.
struct BrokenTransport;

impl Transport for BrokenTransport {
    fn write(&mut self, _bytes: &[u8]) -> Result<(), LinkError> {
        Err(LinkError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "link down",
        )))
    }

    fn read_attempt(&mut self) -> Result<ReadAttempt, LinkError> {
        Err(LinkError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "link down",
        )))
    }

    fn close(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
}

/// A shell over a scripted loopback conversation.
fn crt_shell(loopback: LoopbackTransport) -> CommandShell<LoopbackTransport> {
    let mut shell = CommandShell::new();
    shell
        .attach(Session::new(loopback, Duration::from_millis(50)))
        .unwrap();
    shell
}

/// Text with a query marker is sent and answered with the decoded response.
#[rstest]
fn test_query_text_returns_response() {
    let mut shell = crt_shell(LoopbackTransport::new(vec!["*IDN?"], vec!["ACME,MODEL1"]));
    assert_eq!("ACME,MODEL1", shell.send_or_query("*IDN?"));
    shell.disconnect().unwrap();
}

/// Text without a query marker is send-only: no receive attempt, empty string on success.
#[rstest]
fn test_plain_command_is_send_only() {
    let mut shell = crt_shell(LoopbackTransport::new(vec!["OUTPUT ON"], vec![]));
    assert_eq!("", shell.send_or_query("OUTPUT ON"));
    shell.disconnect().unwrap();
}

/// A silent instrument maps to the literal "Timeout" status.
#[rstest]
fn test_timeout_status_literal() {
    let mut shell = crt_shell(LoopbackTransport::new(vec!["*IDN?"], vec![]));
    assert_eq!(STATUS_TIMEOUT, shell.send_or_query("*IDN?"));
    assert_eq!("Timeout", STATUS_TIMEOUT);
}

/// A transport failure maps to the literal "Error" status, for queries and plain sends alike.
#[rstest]
#[case("*IDN?")]
#[case("OUTPUT ON")]
fn test_error_status_literal(#[case] text: &str) {
    let mut shell = CommandShell::new();
    shell
        .attach(Session::new(BrokenTransport, Duration::from_millis(50)))
        .unwrap();
    assert_eq!(STATUS_ERROR, shell.send_or_query(text));
    assert_eq!("Error", STATUS_ERROR);
}

/// An empty-but-successful response stays distinguishable from both status literals.
#[rstest]
fn test_empty_response_distinct_from_statuses() {
    let mut shell = crt_shell(LoopbackTransport::new(vec!["LABEL?"], vec![""]));
    let response = shell.send_or_query("LABEL?");
    assert_eq!("", response);
    assert_ne!(STATUS_ERROR, response);
    assert_ne!(STATUS_TIMEOUT, response);
}

/// Talking while disconnected is an error, not a crash.
#[rstest]
fn test_disconnected_shell() {
    let mut shell: CommandShell<LoopbackTransport> = CommandShell::new();
    assert!(!shell.is_connected());
    assert_eq!(STATUS_ERROR, shell.send_or_query("*IDN?"));
    assert!(shell.disconnect().is_err());
}

/// The boxed shell opens a transport from runtime-selected parameters.
#[rstest]
fn test_connect_from_params() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let params = ConnectionParams::Tcp(TcpParams::parse("127.0.0.1", &port.to_string(), "1").unwrap());

    let mut shell: CommandShell = CommandShell::new();
    shell.connect(&params).unwrap();
    assert!(shell.is_connected());
    assert!(shell.connect(&params).is_err());
    shell.disconnect().unwrap();
}

/// A connect failure comes back as a displayable message, not a crash.
#[rstest]
fn test_connect_failure_reported_as_message() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let params = ConnectionParams::Tcp(TcpParams::parse("127.0.0.1", &port.to_string(), "1").unwrap());

    let mut shell: CommandShell = CommandShell::new();
    let message = shell.connect(&params).unwrap_err();
    assert!(!message.is_empty());
    assert!(!shell.is_connected());
}

/// A second session cannot be attached while one is live.
#[rstest]
fn test_attach_refused_while_connected() {
    let mut shell = crt_shell(LoopbackTransport::new(vec![], vec![]));
    assert!(shell.is_connected());

    let spare = Session::new(LoopbackTransport::new(vec![], vec![]), Duration::ZERO);
    assert!(shell.attach(spare).is_err());

    shell.disconnect().unwrap();
    assert!(!shell.is_connected());
}
