//! A small blocking APRS-IS client. It connects, logs in with the usual
//! one-line handshake and then hands every received line to a callback:
//! server chatter (`# …`) as comments, everything else as packet frames.
//!
//! The client deliberately does not parse the frames it delivers; real
//! feeds contain plenty of unparseable ones, and it is the caller's call
//! whether to log and continue.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use tracing::{debug, info, warn};

pub const DEFAULT_HOST: &str = "rotate.aprs.net";
pub const DEFAULT_PORT: u16 = 14580;
pub const DEFAULT_FILTER: &str = "t/poimqstunw";

#[derive(Debug, thiserror::Error)]
pub enum IsClientError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Unexpected server banner: {0:?}")]
    UnexpectedBanner(String),
    #[error("Login failed: {0:?}")]
    LoginFailed(String),
}

/// Connection parameters. The defaults point at the public rotation with
/// the catch-all type filter.
#[derive(Debug, Clone)]
pub struct IsConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub passcode: String,
    pub app_name: String,
    pub app_version: String,
    pub filter: String,
}

impl IsConfig {
    pub fn new(user: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: user.into(),
            passcode: passcode.into(),
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            filter: DEFAULT_FILTER.to_string(),
        }
    }

    fn login_line(&self) -> String {
        format!(
            "user {} pass {} {} {} filter {}\r\n",
            self.user, self.passcode, self.app_name, self.app_version, self.filter
        )
    }
}

/// Receives what the client reads. Packet frames come with a running
/// sequence number; `disconnected` is called exactly once per `run`.
pub trait IsCallback {
    fn got_packet(&mut self, frame: &[u8], sequence: u64);
    fn got_comment(&mut self, line: &[u8]);
    fn disconnected(&mut self, reason: &str);
}

pub struct IsClient {
    config: IsConfig,
}

impl IsClient {
    pub fn new(config: IsConfig) -> Self {
        Self { config }
    }

    /// Connects, logs in and reads frames until the server closes the
    /// connection or an I/O error occurs.
    pub fn run(&self, callback: &mut dyn IsCallback) -> Result<(), IsClientError> {
        let address = format!("{}:{}", self.config.host, self.config.port);
        info!(%address, "connecting to APRS-IS");

        let mut stream = TcpStream::connect(&address)?;
        stream.write_all(self.config.login_line().as_bytes())?;

        let mut reader = BufReader::new(stream);
        login(&mut reader, &self.config.user)?;
        info!(user = %self.config.user, "logged in");

        let result = read_lines(&mut reader, callback);
        match &result {
            Ok(()) => callback.disconnected("connection closed by server"),
            Err(e) => {
                warn!(error = %e, "connection lost");
                callback.disconnected(&e.to_string());
            }
        }

        result.map_err(Into::into)
    }
}

fn login<R: BufRead>(reader: &mut R, user: &str) -> Result<(), IsClientError> {
    let banner = read_line(reader)?
        .ok_or_else(|| IsClientError::UnexpectedBanner("connection closed".to_string()))?;
    if !banner.starts_with(b"# ") {
        return Err(IsClientError::UnexpectedBanner(
            String::from_utf8_lossy(&banner).into_owned(),
        ));
    }
    debug!(banner = %String::from_utf8_lossy(&banner), "server banner");

    let response = read_line(reader)?
        .ok_or_else(|| IsClientError::LoginFailed("connection closed".to_string()))?;
    let expected = format!("# logresp {} verified", user);
    if !response.starts_with(expected.as_bytes()) {
        return Err(IsClientError::LoginFailed(
            String::from_utf8_lossy(&response).into_owned(),
        ));
    }

    Ok(())
}

fn read_lines<R: BufRead>(
    reader: &mut R,
    callback: &mut dyn IsCallback,
) -> Result<(), std::io::Error> {
    let mut sequence = 0;

    while let Some(line) = read_line(reader)? {
        if line.is_empty() {
            continue;
        }

        if line.starts_with(b"# ") {
            callback.got_comment(&line);
        } else {
            callback.got_packet(&line, sequence);
            sequence += 1;
        }
    }

    debug!(packets = sequence, "server closed the connection");
    Ok(())
}

/// One line without its terminator; `None` at end of stream.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, std::io::Error> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }

    while line.last() == Some(&b'\n') || line.last() == Some(&b'\r') {
        line.pop();
    }

    Ok(Some(line))
}
