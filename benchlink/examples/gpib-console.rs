//! Query an instrument's identification over GPIB (requires a system VISA installation).
//!
//! Build with the `gpib` feature enabled.

use benchlink::{GpibParams, GpibTransport};

const BOARD: &str = "0";
const ADDRESS: &str = "5";
const TIMEOUT_S: &str = "2";

fn main() {
    let params = GpibParams::parse(BOARD, ADDRESS, TIMEOUT_S).unwrap();
    let mut session = GpibTransport::open(&params).unwrap();

    println!("*IDN? -> {}", session.query("*IDN?").unwrap());

    session.close().unwrap();
}
