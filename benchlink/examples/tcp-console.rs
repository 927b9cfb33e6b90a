//! A minimal operator console over LAN/TCP: type a command, see the instrument's answer.

use std::io::{BufRead, Write};

use benchlink::{CommandShell, ConnectionParams, TcpParams};

const HOST: &str = "192.168.0.10";
const PORT: &str = "8802";
const TIMEOUT_S: &str = "2";

fn main() {
    let params = ConnectionParams::Tcp(TcpParams::parse(HOST, PORT, TIMEOUT_S).unwrap());

    let mut shell: CommandShell = CommandShell::new();
    shell.connect(&params).unwrap();
    println!("Connected to {HOST}:{PORT}. Enter commands, empty line to quit.");

    let stdin = std::io::stdin();
    loop {
        print!("<< ");
        std::io::stdout().flush().unwrap();
        let mut line = String::new();
        stdin.lock().read_line(&mut line).unwrap();
        let cmd = line.trim();
        if cmd.is_empty() {
            break;
        }
        // Queries answer with text, plain commands with an empty string,
        // failures with "Error" or "Timeout".
        println!(">> {}", shell.send_or_query(cmd));
    }

    shell.disconnect().unwrap();
}
