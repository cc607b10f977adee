//! Connects to APRS-IS and dumps every frame it can decode.
//!
//! Usage: stream <callsign> [passcode]

use aprs_decode::client::{IsCallback, IsClient, IsConfig};

struct Printer;

impl IsCallback for Printer {
    fn got_packet(&mut self, frame: &[u8], sequence: u64) {
        match aprs_decode::parse(frame) {
            Ok(packet) => println!("[{}] {:?}", sequence, packet),
            Err(e) => eprintln!("[{}] unparseable: {}", sequence, e),
        }
    }

    fn got_comment(&mut self, line: &[u8]) {
        eprintln!("server: {}", String::from_utf8_lossy(line));
    }

    fn disconnected(&mut self, reason: &str) {
        eprintln!("disconnected: {}", reason);
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let user = args.next().unwrap_or_else(|| "N0CALL".to_string());
    let passcode = args.next().unwrap_or_else(|| "-1".to_string());

    let client = IsClient::new(IsConfig::new(user, passcode));
    if let Err(e) = client.run(&mut Printer) {
        eprintln!("client error: {}", e);
        std::process::exit(1);
    }
}
