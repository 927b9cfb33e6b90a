//! Tests for the scripted loopback transport itself.

use rstest::*;

use benchlink::{LoopbackTransport, ReadAttempt, Reply, Transport};

/// Framed commands matching the script are accepted in order.
#[rstest]
fn test_expected_commands_accepted() {
    let mut lbk = LoopbackTransport::new(vec!["cmd1", "cmd2"], vec![]);
    lbk.write(b"cmd1\r\n").unwrap();
    lbk.write(b"cmd2\r\n").unwrap();
    lbk.finalize();
}

/// An unexpected command panics.
#[rstest]
#[should_panic]
fn test_unexpected_command_panics() {
    let mut lbk = LoopbackTransport::new(vec!["cmd1"], vec![]);
    lbk.write(b"other\r\n").unwrap();
}

/// A command without the wire terminator panics: framing is part of the contract.
#[rstest]
#[should_panic]
fn test_unframed_command_panics() {
    let mut lbk = LoopbackTransport::new(vec!["cmd1"], vec![]);
    lbk.write(b"cmd1").unwrap();
}

/// Scripted replies play back in order; an exhausted script reads as an idle link.
#[rstest]
fn test_replies_play_back_in_order() {
    let mut lbk = LoopbackTransport::with_replies(
        vec![],
        vec![
            Reply::Chunk(b"AB".to_vec()),
            Reply::Signal,
            Reply::Chunk(b"C\n".to_vec()),
        ],
    );
    assert_eq!(ReadAttempt::Data(b"AB".to_vec()), lbk.read_attempt().unwrap());
    assert_eq!(ReadAttempt::Signal, lbk.read_attempt().unwrap());
    assert_eq!(
        ReadAttempt::Data(b"C\n".to_vec()),
        lbk.read_attempt().unwrap()
    );
    assert_eq!(ReadAttempt::Empty, lbk.read_attempt().unwrap());
    assert_eq!(ReadAttempt::Empty, lbk.read_attempt().unwrap());
}

/// Responses given to `new` arrive as single terminated lines.
#[rstest]
fn test_line_responses_carry_terminator() {
    let mut lbk = LoopbackTransport::new(vec![], vec!["resp"]);
    assert_eq!(
        ReadAttempt::Data(b"resp\r\n".to_vec()),
        lbk.read_attempt().unwrap()
    );
}

/// `finalize` passes on an empty script and panics on leftovers of either direction.
#[rstest]
fn test_finalize_empty() {
    let mut lbk = LoopbackTransport::new(vec![], vec![]);
    lbk.finalize();
}

#[rstest]
#[case(vec!["cmd"], vec![])]
#[case(vec![], vec!["resp"])]
#[case(vec!["cmd"], vec!["resp"])]
#[should_panic]
fn test_finalize_leftover_panics(#[case] from_host: Vec<&str>, #[case] from_inst: Vec<&str>) {
    let mut lbk = LoopbackTransport::new(from_host, from_inst);
    lbk.finalize();
}

/// Closing is idempotent-safe: a double close must not crash.
#[rstest]
fn test_double_close() {
    let mut lbk = LoopbackTransport::new(vec![], vec![]);
    lbk.close().unwrap();
    lbk.close().unwrap();
}
