//! Query an instrument's identification over an RS-232C/USB serial port.

use benchlink::{SerialParams, SerialTransport};

const PORT: &str = "/dev/ttyUSB0";
const BAUD_RATE: &str = "9600";
const TIMEOUT_S: &str = "2";

fn main() {
    let params = SerialParams::parse(PORT, BAUD_RATE, TIMEOUT_S).unwrap();
    let mut session = SerialTransport::open(&params).unwrap();

    println!("*IDN? -> {}", session.query("*IDN?").unwrap());

    // Plain commands are send-only; no response is read.
    session.send("*CLS").unwrap();

    session.close().unwrap();
}
